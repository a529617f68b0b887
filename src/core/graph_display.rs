// src/core/graph_display.rs

use crate::core::flowchart::Flowchart;
use crate::models::{Block, BlockType};
use std::collections::HashSet;

/// Prints an ASCII tree of the flowchart, walked from its Start block.
pub fn display_flowchart(flowchart: &Flowchart) {
    for line in render_flowchart(flowchart) {
        println!("{line}");
    }
}

/// Renders the flowchart as tree lines. A block already printed elsewhere in
/// the tree shows up as a `↺` back-reference instead of being expanded again.
pub fn render_flowchart(flowchart: &Flowchart) -> Vec<String> {
    let mut lines = Vec::new();

    let Some(start) = flowchart.start_block() else {
        lines.push("(no Start block)".to_string());
        return lines;
    };

    let mut printed = HashSet::new();
    printed.insert(start.id().to_string());
    lines.push(describe(start));
    render_children(flowchart, start, "", &mut printed, &mut lines);

    let unreachable: Vec<&Block> = flowchart
        .blocks()
        .filter(|b| !printed.contains(b.id()))
        .collect();
    if !unreachable.is_empty() {
        lines.push(String::new());
        lines.push("Unreachable:".to_string());
        for block in unreachable {
            lines.push(format!("  {}", describe(block)));
        }
    }

    lines
}

fn describe(block: &Block) -> String {
    format!("{} ({})", block.name, block.block_type())
}

/// Recursive function to render a block's successors and their descendants.
fn render_children(
    flowchart: &Flowchart,
    block: &Block,
    prefix: &str,
    printed: &mut HashSet<String>,
    lines: &mut Vec<String>,
) {
    let is_branch = block.block_type() == BlockType::Branch;
    let edges: Vec<_> = flowchart.connections_from(block.id()).collect();

    for (i, conn) in edges.iter().enumerate() {
        let is_last = i + 1 == edges.len();
        let connector = if is_last { "└─" } else { "├─" };
        let label = match (is_branch, conn.is_true_path) {
            (true, true) => "[true] ",
            (true, false) => "[false] ",
            (false, _) => "",
        };

        let Some(target) = flowchart.block(&conn.target_block_id) else {
            lines.push(format!("{prefix}{connector}{label}? {}", conn.target_block_id));
            continue;
        };

        if !printed.insert(target.id().to_string()) {
            lines.push(format!("{prefix}{connector}{label}↺ {}", target.name));
            continue;
        }

        lines.push(format!("{prefix}{connector}{label}{}", describe(target)));
        let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
        render_children(flowchart, target, &child_prefix, printed, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_branch_and_loop() {
        let mut fc = Flowchart::new();
        let start = fc.start_block_id().unwrap().to_string();
        let check = Block::branch("{{done}}").named("Done?");
        let check_id = check.id().to_string();
        let work = Block::prompt("Keep going").named("Work");
        let work_id = work.id().to_string();
        let end = Block::end().named("Finish");
        let end_id = end.id().to_string();
        for block in [check, work, end] {
            fc.add_block(block).unwrap();
        }
        fc.connect(&start, &check_id).unwrap();
        fc.connect_path(&check_id, &end_id, true).unwrap();
        fc.connect_path(&check_id, &work_id, false).unwrap();
        fc.connect(&work_id, &check_id).unwrap();

        assert_eq!(
            render_flowchart(&fc),
            vec![
                "Start Block (start)",
                "└─Done? (branch)",
                "   ├─[true] Finish (end)",
                "   └─[false] Work (prompt)",
                "      └─↺ Done?",
            ]
        );
    }

    #[test]
    fn test_unreachable_blocks_are_listed() {
        let mut fc = Flowchart::new();
        fc.add_block(Block::refresh().named("Stray")).unwrap();
        let lines = render_flowchart(&fc);
        assert_eq!(lines.last().unwrap(), "  Stray (refresh)");
    }

    #[test]
    fn test_missing_start() {
        assert_eq!(render_flowchart(&Flowchart::empty()), vec!["(no Start block)"]);
    }
}
