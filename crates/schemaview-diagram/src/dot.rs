//! Graphviz DOT output for table diagrams

use crate::diagram::{Diagram, DiagramNode};

/// Generate DOT text for a diagram
///
/// Each table is a rounded box with one row per column; every row carries a
/// `port_<column>` port so edges attach to the exact column. Edges leave
/// the source on its east side and enter the target on its west side.
pub fn to_dot(diagram: &Diagram) -> String {
    let mut output = String::new();

    output.push_str("digraph table_diagram {\n");
    output.push_str(&format!("  rankdir={};\n", diagram.rankdir));
    output.push_str("  concentrate=true;\n");
    output.push_str("  node [shape=rectangle, style=\"rounded,filled\"];\n\n");

    for cluster in &diagram.clusters {
        output.push_str(&format!(
            "  subgraph {} {{\n",
            escape_dot_id(&format!("cluster_{}", cluster.name))
        ));
        output.push_str(&format!("    label={};\n", quote(&cluster.name)));
        output.push_str("    style=filled;\n");
        output.push_str(&format!("    color={};\n", quote(&cluster.tone_colour)));
        output.push_str(&format!("    fillcolor={};\n", quote(&cluster.tone_colour)));
        for node in diagram.members(&cluster.name) {
            output.push_str("  ");
            push_node(&mut output, node);
        }
        output.push_str("  }\n\n");
    }

    for node in diagram.unclustered() {
        push_node(&mut output, node);
    }

    if !diagram.edges.is_empty() {
        output.push('\n');
    }

    for edge in &diagram.edges {
        output.push_str(&format!(
            "  {}:{}:e -> {}:{}:w;\n",
            escape_dot_id(&edge.source_table),
            escape_dot_id(&port(&edge.source_column)),
            escape_dot_id(&edge.target_table),
            escape_dot_id(&port(&edge.target_column)),
        ));
    }

    output.push_str("}\n");
    output
}

fn push_node(output: &mut String, node: &DiagramNode) {
    output.push_str(&format!(
        "  {} [fillcolor={}, label=<{}>];\n",
        escape_dot_id(&node.table),
        quote(&node.fill_colour),
        table_label(node)
    ));
}

/// HTML-like label: table name header, then one white cell per column
fn table_label(node: &DiagramNode) -> String {
    let mut html = String::new();

    html.push_str("<table border=\"0\" cellborder=\"1\" cellspacing=\"0\">");
    html.push_str(&format!("<tr><td><b>{}</b></td></tr>", escape_html(&node.table)));

    for column in &node.columns {
        html.push_str(&format!(
            "<tr><td bgcolor=\"white\" port=\"{}\">{}</td></tr>",
            escape_html(&port(column)),
            escape_html(column)
        ));
    }

    html.push_str("</table>");
    html
}

fn port(column: &str) -> String {
    format!("port_{}", column)
}

/// Escape a string for use in DOT HTML labels
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape a string for use as a DOT node ID
///
/// Bare IDs may not start with a digit: `2fa_tokens` would lex as the
/// numeral `2` followed by `fa_tokens`.
fn escape_dot_id(s: &str) -> String {
    let bare = !s.is_empty()
        && !s.starts_with(|c: char| c.is_ascii_digit())
        && s.chars().all(|c| c.is_alphanumeric() || c == '_');
    if bare {
        s.to_string()
    } else {
        quote(s)
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
