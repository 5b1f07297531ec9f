use crate::node::ComponentNode;

/// Visitor pattern for traversing a component tree immutably
///
/// The default implementation walks children first, then every slot in
/// declaration order. Override `visit_node` to act on nodes and call
/// [`walk_node`] to keep descending.
pub trait Visitor: Sized {
    fn visit_node(&mut self, node: &ComponentNode) {
        walk_node(self, node);
    }

    /// Called once per named slot before its content is visited
    fn visit_slot(&mut self, _owner: &ComponentNode, _name: &str, nodes: &[ComponentNode]) {
        for node in nodes {
            self.visit_node(node);
        }
    }
}

/// Mutable visitor pattern for transforming component trees
pub trait VisitorMut: Sized {
    fn visit_node_mut(&mut self, node: &mut ComponentNode) {
        walk_node_mut(self, node);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &ComponentNode) {
    for child in &node.children {
        visitor.visit_node(child);
    }

    for (name, nodes) in node.slots.iter() {
        visitor.visit_slot(node, name, nodes);
    }
}

pub fn walk_node_mut<V: VisitorMut>(visitor: &mut V, node: &mut ComponentNode) {
    for child in &mut node.children {
        visitor.visit_node_mut(child);
    }

    for (_, nodes) in node.slots.iter_mut() {
        for child in nodes.iter_mut() {
            visitor.visit_node_mut(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DepthCounter {
        depth: usize,
        max_depth: usize,
    }

    impl Visitor for DepthCounter {
        fn visit_node(&mut self, node: &ComponentNode) {
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
            walk_node(self, node);
            self.depth -= 1;
        }
    }

    struct SlotNames(Vec<String>);

    impl Visitor for SlotNames {
        fn visit_slot(&mut self, _owner: &ComponentNode, name: &str, nodes: &[ComponentNode]) {
            self.0.push(name.to_string());
            for node in nodes {
                self.visit_node(node);
            }
        }
    }

    struct Renamer;

    impl VisitorMut for Renamer {
        fn visit_node_mut(&mut self, node: &mut ComponentNode) {
            node.id = format!("copy-{}", node.id);
            walk_node_mut(self, node);
        }
    }

    fn tree() -> ComponentNode {
        ComponentNode::new("container", "root")
            .with_child(ComponentNode::new("row", "r").with_child(ComponentNode::new("text", "t")))
            .with_slot_child("footer", ComponentNode::new("text", "f"))
            .with_slot_child("aside", ComponentNode::new("text", "a"))
    }

    #[test]
    fn test_depth() {
        let mut counter = DepthCounter {
            depth: 0,
            max_depth: 0,
        };
        counter.visit_node(&tree());
        assert_eq!(counter.max_depth, 3);
    }

    #[test]
    fn test_slot_visit_order() {
        let mut names = SlotNames(Vec::new());
        names.visit_node(&tree());
        assert_eq!(names.0, vec!["footer", "aside"]);
    }

    #[test]
    fn test_mutable_walk_reaches_slots() {
        let mut root = tree();
        Renamer.visit_node_mut(&mut root);
        assert_eq!(root.id, "copy-root");
        assert_eq!(root.children[0].children[0].id, "copy-t");
        assert_eq!(root.slots.get("aside").unwrap()[0].id, "copy-a");
    }
}
