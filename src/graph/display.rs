//! Human-readable listing of a graph

use super::debate::DebateGraph;
use std::fmt;

fn write_list(f: &mut fmt::Formatter<'_>, label: &str, items: &[String]) -> fmt::Result {
    for item in items {
        writeln!(f, "    {}: {}", label, item)?;
    }
    Ok(())
}

impl fmt::Display for DebateGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nodes ({}):", self.node_count())?;
        for node in self.nodes() {
            let marker = if node.is_rebuttal { " [rebuttal]" } else { "" };
            writeln!(f, "  {}{}", node.argument(), marker)?;
            write_list(f, "importance", &node.importance)?;
            write_list(f, "uniqueness", &node.uniqueness)?;
            write_list(f, "importance rebuttal", &node.importance_rebuttals)?;
            write_list(f, "uniqueness rebuttal", &node.uniqueness_rebuttals)?;
            for key in node.causes() {
                writeln!(f, "    <- {}", key.cause)?;
            }
        }

        writeln!(f, "Edges ({}):", self.edge_count())?;
        for edge in self.ordered_edges() {
            let marker = if edge.is_rebuttal { " [rebuttal]" } else { "" };
            writeln!(f, "  {} -> {}{}", edge.cause(), edge.effect(), marker)?;
            write_list(f, "certainty", &edge.certainty)?;
            write_list(f, "uniqueness", &edge.uniqueness)?;
            write_list(f, "certainty rebuttal", &edge.certainty_rebuttals)?;
            write_list(f, "uniqueness rebuttal", &edge.uniqueness_rebuttals)?;
        }

        let satellites = self.node_rebuttals().len()
            + self.edge_rebuttals().len()
            + self.counter_arguments().len()
            + self.turn_arguments().len();
        if satellites > 0 {
            writeln!(f, "Rebuttals ({}):", satellites)?;
            for r in self.node_rebuttals() {
                writeln!(f, "  {} rebuts {} of {}", r.rebuttal, r.kind, r.target)?;
            }
            for r in self.edge_rebuttals() {
                writeln!(f, "  {} rebuts {} of {}", r.rebuttal, r.kind, r.target)?;
            }
            for r in self.counter_arguments() {
                writeln!(f, "  {} counters {}", r.rebuttal, r.target)?;
            }
            for r in self.turn_arguments() {
                writeln!(f, "  {} turns the argument", r.rebuttal)?;
            }
        }
        Ok(())
    }
}
