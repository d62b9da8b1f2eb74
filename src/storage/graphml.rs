//! GraphML export for the tag graph and the induced community graph

use crate::cluster::InducedGraph;
use crate::graph::TagGraph;
use std::io::{self, Write};

/// Escape text for use in XML attributes and content
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn write_header<W: Write>(out: &mut W, keys: &[(&str, &str, &str)]) -> io::Result<()> {
    writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(out, "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">")?;
    for (id, domain, kind) in keys {
        writeln!(
            out,
            "  <key id=\"{id}\" for=\"{domain}\" attr.name=\"{id}\" attr.type=\"{kind}\"/>"
        )?;
    }
    writeln!(out, "  <graph edgedefault=\"undirected\">")
}

fn write_footer<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "  </graph>")?;
    writeln!(out, "</graphml>")
}

/// Write the annotated tag graph.
///
/// Node keys: `s` popularity, `eig` centrality, `part` community (only on
/// partitioned nodes). Edge key: `weight`.
pub fn write_tag_graph<W: Write>(graph: &TagGraph, out: &mut W) -> io::Result<()> {
    write_header(
        out,
        &[
            ("s", "node", "long"),
            ("eig", "node", "double"),
            ("part", "node", "int"),
            ("weight", "edge", "double"),
        ],
    )?;

    for node in graph.nodes() {
        writeln!(out, "    <node id=\"{}\">", escape_xml(&node.tag))?;
        writeln!(out, "      <data key=\"s\">{}</data>", node.popularity)?;
        writeln!(out, "      <data key=\"eig\">{}</data>", node.centrality)?;
        if let Some(part) = node.community {
            writeln!(out, "      <data key=\"part\">{}</data>", part)?;
        }
        writeln!(out, "    </node>")?;
    }

    for (i, j, w) in graph.edges() {
        writeln!(
            out,
            "    <edge source=\"{}\" target=\"{}\">",
            escape_xml(&graph.node(i).tag),
            escape_xml(&graph.node(j).tag)
        )?;
        writeln!(out, "      <data key=\"weight\">{}</data>", w)?;
        writeln!(out, "    </edge>")?;
    }

    write_footer(out)
}

/// Write the induced graph, nodes named by label (or community id)
pub fn write_induced_graph<W: Write>(graph: &InducedGraph, out: &mut W) -> io::Result<()> {
    write_header(out, &[("s", "node", "long"), ("weight", "edge", "double")])?;

    let names: Vec<String> = graph.nodes().map(|n| escape_xml(&n.name())).collect();

    for (node, name) in graph.nodes().zip(&names) {
        writeln!(out, "    <node id=\"{}\">", name)?;
        writeln!(out, "      <data key=\"s\">{}</data>", node.size)?;
        writeln!(out, "    </node>")?;
    }

    for (i, j, w) in graph.edges() {
        writeln!(out, "    <edge source=\"{}\" target=\"{}\">", names[i], names[j])?;
        writeln!(out, "      <data key=\"weight\">{}</data>", w)?;
        writeln!(out, "    </edge>")?;
    }

    write_footer(out)
}
