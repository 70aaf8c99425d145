//! Property tests for subtree translation, duplication and builder edits

use proptest::prelude::*;
use trellis::prelude::*;

#[derive(Debug, Clone)]
enum Shape {
    Class(i32, i32),
    Package(i32, i32, Vec<Shape>),
}

fn coord() -> impl Strategy<Value = i32> {
    -1_000..1_000
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = (coord(), coord()).prop_map(|(x, y)| Shape::Class(x, y));
    leaf.prop_recursive(4, 32, 4, |inner| {
        (coord(), coord(), prop::collection::vec(inner, 0..4))
            .prop_map(|(x, y, children)| Shape::Package(x, y, children))
    })
}

/// Build a free-standing subtree, linking both sides by hand
fn build(shape: &Shape) -> Node {
    match shape {
        Shape::Class(x, y) => Node::new(NodeKind::Class, Point::new(*x, *y)),
        Shape::Package(x, y, children) => {
            let package = ParentNode::new(NodeKind::Package, Point::new(*x, *y)).unwrap();
            for child in children {
                let child = build(child);
                child.set_parent(&package).unwrap();
                package.add_child(&child).unwrap();
            }
            package.into_node()
        }
    }
}

/// The subtree's layout with ids left out
fn layout(snapshot: &NodeSnapshot) -> String {
    let children: Vec<String> = snapshot.children.iter().map(layout).collect();
    format!(
        "{}@{},{}[{}]",
        snapshot.kind,
        snapshot.x,
        snapshot.y,
        children.join(" ")
    )
}

fn subtree(node: &Node) -> Vec<Node> {
    let mut nodes = vec![node.clone()];
    nodes.extend(node.descendants());
    nodes
}

#[derive(Debug, Clone)]
enum Edit {
    AddRoot(bool),
    AddChild(usize, bool),
    MoveInto(usize, usize),
    MoveToRoot(usize),
    Remove(usize),
    Duplicate(usize),
    Translate(usize, i32, i32),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        any::<bool>().prop_map(Edit::AddRoot),
        (any::<usize>(), any::<bool>()).prop_map(|(i, c)| Edit::AddChild(i, c)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Edit::MoveInto(a, b)),
        any::<usize>().prop_map(Edit::MoveToRoot),
        any::<usize>().prop_map(Edit::Remove),
        any::<usize>().prop_map(Edit::Duplicate),
        (any::<usize>(), -50..50, -50..50).prop_map(|(i, dx, dy)| Edit::Translate(i, dx, dy)),
    ]
}

fn new_node(container: bool) -> Node {
    if container {
        ParentNode::new(NodeKind::Package, Point::ORIGIN)
            .unwrap()
            .into_node()
    } else {
        Node::new(NodeKind::Class, Point::ORIGIN)
    }
}

fn pick(nodes: &[Node], index: usize) -> Option<Node> {
    if nodes.is_empty() {
        None
    } else {
        Some(nodes[index % nodes.len()].clone())
    }
}

/// Apply one edit; refusals are fine, returning whether it was refused
fn apply(builder: &DiagramBuilder, edit: &Edit) -> bool {
    let nodes = builder.diagram().all_nodes();
    let containers: Vec<ParentNode> = nodes.iter().filter_map(Node::as_parent).collect();
    let result = match edit {
        Edit::AddRoot(container) => builder.add_node(&new_node(*container)),
        Edit::AddChild(i, container) => match containers.get(i % containers.len().max(1)) {
            Some(parent) => builder.add_child(parent, &new_node(*container)),
            None => return false,
        },
        Edit::MoveInto(a, b) => {
            let parent = containers.get(b % containers.len().max(1));
            match (pick(&nodes, *a), parent) {
                (Some(node), Some(parent)) => builder.move_into(&node, parent),
                _ => return false,
            }
        }
        Edit::MoveToRoot(i) => match pick(&nodes, *i) {
            Some(node) => builder.move_to_root(&node),
            None => return false,
        },
        Edit::Remove(i) => match pick(&nodes, *i) {
            Some(node) => builder.remove_node(&node),
            None => return false,
        },
        Edit::Duplicate(i) => match pick(&nodes, *i) {
            Some(node) => builder.duplicate(&node).map(|_| ()),
            None => return false,
        },
        Edit::Translate(i, dx, dy) => match pick(&nodes, *i) {
            Some(node) => {
                node.translate(*dx, *dy);
                Ok(())
            }
            None => return false,
        },
    };
    result.is_err()
}

proptest! {
    #[test]
    fn translate_moves_whole_subtree(
        shape in shape_strategy(),
        dx in -100..100i32,
        dy in -100..100i32,
    ) {
        let root = build(&shape);
        let before: Vec<Point> = subtree(&root).iter().map(Node::position).collect();

        root.translate(dx, dy);

        let after: Vec<Point> = subtree(&root).iter().map(Node::position).collect();
        prop_assert_eq!(before.len(), after.len());
        for (old, new) in before.iter().zip(&after) {
            prop_assert_eq!(*new, old.translated(dx, dy));
        }
    }

    #[test]
    fn duplicate_is_isomorphic_and_fresh(shape in shape_strategy()) {
        let original = build(&shape);
        let copy = original.duplicate();

        prop_assert_eq!(layout(&copy.snapshot()), layout(&original.snapshot()));
        prop_assert!(copy.diagram().is_none());
        prop_assert!(!copy.has_parent());

        let original_ids: Vec<ElementId> = subtree(&original).iter().map(Node::id).collect();
        for node in subtree(&copy) {
            prop_assert!(!original_ids.contains(&node.id()));
            if let Some(parent) = node.parent_opt() {
                prop_assert!(parent.contains_child(&node));
                prop_assert!(!original_ids.contains(&parent.id()));
            }
        }
    }

    #[test]
    fn duplicate_is_independent(shape in shape_strategy(), dx in 1..100i32) {
        let original = build(&shape);
        let expected = layout(&original.snapshot());
        let copy = original.duplicate();

        copy.translate(dx, 0);
        if let Some(container) = copy.as_parent() {
            container.add_child(&Node::new(NodeKind::Note, Point::ORIGIN)).unwrap();
        }

        prop_assert_eq!(layout(&original.snapshot()), expected);
    }

    #[test]
    fn builder_edits_keep_diagram_consistent(
        edits in prop::collection::vec(edit_strategy(), 1..40),
    ) {
        let builder = DiagramBuilder::new(Diagram::new(DiagramType::Class));
        for edit in &edits {
            let before = builder.diagram().snapshot();
            let refused = apply(&builder, edit);
            if refused {
                prop_assert_eq!(builder.diagram().snapshot(), before);
            }
            prop_assert_eq!(validate(builder.diagram()), Vec::<Violation>::new());
        }
    }
}
