//! The radix-tree fast path for request routing: templates are split on
//! `/` into a tree of literal and single-segment wildcard (`{name}`) nodes.
//! Literal segments always outrank a wildcard at the same depth; remaining
//! ties are resolved by the order children were inserted in, which mirrors
//! the order paths were declared in the specification.

use crate::model::{PathItem, Spec};
use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    Static(String),
    Wildcard,
}

fn split_template(template: &str) -> Vec<Segment> {
    template
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with('{') && s.ends_with('}') && !s.contains(|c| c == ';' || c == '.') {
                Segment::Wildcard
            } else {
                Segment::Static(s.to_string())
            }
        })
        .collect()
}

fn param_name(template_segment: &str) -> Option<&str> {
    template_segment.strip_prefix('{').and_then(|s| s.strip_suffix('}'))
}

#[derive(Default)]
struct Node {
    literal_children: IndexMap<String, Node>,
    wildcard_child: Option<(String, Box<Node>)>,
    leaf: Option<(String, Arc<PathItem>)>,
}

pub struct RadixTree {
    root: Node,
}

pub struct RadixMatch {
    pub template: String,
    pub path_item: Arc<PathItem>,
    pub bindings: Vec<(String, String)>,
}

impl RadixTree {
    pub fn build(spec: &Spec) -> Self {
        let mut root = Node::default();
        for (template, path_item) in &spec.paths {
            let segments = split_template(template);
            let raw_segments: Vec<&str> = template.split('/').filter(|s| !s.is_empty()).collect();
            let mut node = &mut root;
            for (seg, raw) in segments.iter().zip(raw_segments.iter()) {
                node = match seg {
                    Segment::Static(s) => node.literal_children.entry(s.clone()).or_default(),
                    Segment::Wildcard => {
                        let name = param_name(raw).unwrap_or("").to_string();
                        if node.wildcard_child.is_none() {
                            node.wildcard_child = Some((name, Box::new(Node::default())));
                        }
                        node.wildcard_child.as_mut().map(|(_, n)| n.as_mut()).unwrap()
                    }
                };
            }
            node.leaf = Some((template.clone(), Arc::new(path_item.clone())));
        }
        RadixTree { root }
    }

    pub fn find(&self, path: &str) -> Option<RadixMatch> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut bindings = Vec::new();
        Self::walk(&self.root, &segments, &mut bindings).map(|(template, path_item)| RadixMatch {
            template,
            path_item,
            bindings,
        })
    }

    fn walk(node: &Node, remaining: &[&str], bindings: &mut Vec<(String, String)>) -> Option<(String, Arc<PathItem>)> {
        if remaining.is_empty() {
            return node.leaf.clone();
        }
        let (head, tail) = (remaining[0], &remaining[1..]);

        if let Some(child) = node.literal_children.get(head) {
            if let Some(found) = Self::walk(child, tail, bindings) {
                return Some(found);
            }
        }

        if let Some((name, child)) = &node.wildcard_child {
            let mark = bindings.len();
            bindings.push((name.clone(), head.to_string()));
            if let Some(found) = Self::walk(child, tail, bindings) {
                return Some(found);
            }
            bindings.truncate(mark);
        }

        None
    }
}
