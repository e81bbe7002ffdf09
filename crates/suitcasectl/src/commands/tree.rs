use std::collections::BTreeMap;

use anyhow::{Context, Result};
use suitcasectl_options::InventoryArgs;

#[derive(Default)]
struct Node {
    children: BTreeMap<String, Node>,
}

/// `tree`: print an existing inventory's files as a directory tree.
pub(crate) fn handle(args: InventoryArgs) -> Result<()> {
    let inventory = suitcasectl_manifest::read_from(&args.inventory_file)
        .with_context(|| format!("reading inventory {}", args.inventory_file.display()))?;

    let mut root = Node::default();
    for file in &inventory.files {
        let mut node = &mut root;
        for part in file.destination.trim_start_matches('/').split('/').filter(|s| !s.is_empty()) {
            node = node.children.entry(part.to_string()).or_default();
        }
    }

    println!("/");
    print_tree(&root, "");
    Ok(())
}

fn print_tree(node: &Node, prefix: &str) {
    let count = node.children.len();
    for (i, (name, child)) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        println!("{prefix}{branch}{name}");
        let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
        print_tree(child, &child_prefix);
    }
}
