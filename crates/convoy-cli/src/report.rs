use std::fmt::Write;

use crate::simulation::{RoundSummary, SimulationReport};

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}

fn round_block(out: &mut String, round: &RoundSummary) {
    let _ = writeln!(
        out,
        "Round {:>3}: {} interactions ({} honest, {} malicious)",
        round.round, round.interactions, round.honest_interactions, round.malicious_interactions
    );
    for standing in &round.standings {
        let marker = if standing.malicious { " [malicious]" } else { "" };
        let change = standing
            .change
            .map(|c| format!(" ({c:+.4})"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "    {:>4}: {:.4}{}{}",
            standing.id, standing.reputation, change, marker
        );
    }
    let _ = writeln!(
        out,
        "    range [{:.4}, {:.4}]  honest {}  malicious {}  gap {}",
        round.min,
        round.max,
        opt(round.honest_mean),
        opt(round.malicious_mean),
        opt(round.gap())
    );
}

/// Plain-text rendering of a simulation run.
pub fn render(report: &SimulationReport) -> String {
    let mut out = String::new();
    let malicious: Vec<&str> = report.malicious.iter().map(|m| m.as_str()).collect();
    let _ = writeln!(
        out,
        "=== Convoy: {} agents, malicious [{}], {} rounds ===\n",
        report.agents.len(),
        malicious.join(", "),
        report.rounds.len()
    );

    for round in &report.rounds {
        round_block(&mut out, round);
    }

    let _ = writeln!(out, "\nFinal ranking:");
    for (i, candidate) in report.ranking.iter().enumerate() {
        let marker = if report.malicious.contains(&candidate.id) {
            " [malicious]"
        } else {
            ""
        };
        let _ = writeln!(out, "  {}. {} {:.4}{}", i + 1, candidate.id, candidate.score, marker);
    }

    let _ = writeln!(out, "\nProvider selection:");
    for (agent, choice) in &report.selections {
        let choice = choice.as_ref().map_or("(none)", |c| c.as_str());
        let _ = writeln!(out, "  {agent} -> {choice}");
    }
    let _ = writeln!(out, "\nTotal interactions: {}", report.total_interactions);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::AgentStanding;
    use convoy_reputation::RankedCandidate;
    use convoy_types::AgentId;
    use std::collections::BTreeMap;

    fn report() -> SimulationReport {
        let standings = vec![
            AgentStanding {
                id: AgentId::from("1"),
                malicious: false,
                reputation: 0.6,
                change: None,
            },
            AgentStanding {
                id: AgentId::from("2"),
                malicious: true,
                reputation: 0.4,
                change: Some(-0.05),
            },
        ];
        let mut selections = BTreeMap::new();
        selections.insert(AgentId::from("1"), None);
        selections.insert(AgentId::from("2"), Some(AgentId::from("1")));
        SimulationReport {
            agents: vec![AgentId::from("1"), AgentId::from("2")],
            malicious: vec![AgentId::from("2")],
            rounds: vec![RoundSummary {
                round: 1,
                interactions: 2,
                honest_interactions: 1,
                malicious_interactions: 1,
                standings,
                min: 0.4,
                max: 0.6,
                honest_mean: Some(0.6),
                malicious_mean: Some(0.4),
            }],
            ranking: vec![
                RankedCandidate {
                    id: AgentId::from("1"),
                    score: 0.6,
                },
                RankedCandidate {
                    id: AgentId::from("2"),
                    score: 0.4,
                },
            ],
            selections,
            total_interactions: 2,
        }
    }

    #[test]
    fn test_render_contains_sections() {
        let text = render(&report());
        assert!(text.contains("2 agents, malicious [2], 1 rounds"));
        assert!(text.contains("gap 0.2000"));
        assert!(text.contains("(-0.0500) [malicious]"));
        assert!(text.contains("1. 1 0.6000"));
        assert!(text.contains("1 -> (none)"));
        assert!(text.contains("2 -> 1"));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["selections"]["2"], "1");
        assert_eq!(json["rounds"][0]["honest_mean"], 0.6);
    }
}
