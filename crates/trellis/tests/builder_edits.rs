//! Integration tests for composed builder edits

use trellis::prelude::*;

fn class_builder() -> DiagramBuilder {
    DiagramBuilder::new(Diagram::new(DiagramType::Class))
}

#[test]
fn test_refused_edit_leaves_snapshot_unchanged() {
    let builder = class_builder();
    let outer = ParentNode::new(NodeKind::Package, Point::ORIGIN).unwrap();
    let inner = ParentNode::new(NodeKind::Package, Point::new(5, 5)).unwrap();
    builder.add_node(&outer).unwrap();
    builder.add_child(&outer, &inner).unwrap();
    let before = builder.diagram().snapshot();

    assert!(builder.move_into(&outer, &inner).is_err());
    assert!(builder.move_into(&outer, &outer).is_err());
    assert!(builder
        .add_child(&inner, &Node::new(NodeKind::Actor, Point::ORIGIN))
        .is_err());

    assert_eq!(builder.diagram().snapshot(), before);
}

#[test]
fn test_move_into_same_parent_is_noop() {
    let builder = class_builder();
    let package = ParentNode::new(NodeKind::Package, Point::ORIGIN).unwrap();
    let first = Node::new(NodeKind::Class, Point::ORIGIN);
    let second = Node::new(NodeKind::Class, Point::ORIGIN);
    builder.add_node(&package).unwrap();
    builder.add_child(&package, &first).unwrap();
    builder.add_child(&package, &second).unwrap();

    builder.move_into(&first, &package).unwrap();
    assert_eq!(package.children(), vec![first, second]);
}

#[test]
fn test_move_deep_subtree_between_parents() {
    let builder = class_builder();
    let left = ParentNode::new(NodeKind::Package, Point::ORIGIN).unwrap();
    let right = ParentNode::new(NodeKind::Package, Point::new(100, 0)).unwrap();
    let middle = ParentNode::new(NodeKind::Package, Point::ORIGIN).unwrap();
    let leaf = Node::new(NodeKind::Interface, Point::ORIGIN);
    builder.add_node(&left).unwrap();
    builder.add_node(&right).unwrap();
    builder.add_child(&left, &middle).unwrap();
    builder.add_child(&middle, &leaf).unwrap();

    builder.move_into(&middle, &right).unwrap();

    assert_eq!(leaf.root(), right.as_node().clone());
    assert_eq!(leaf.depth(), 2);
    assert_eq!(left.child_count(), 0);
    assert!(builder.diagram().check().is_ok());
}

#[test]
fn test_z_order_of_roots() {
    let builder = class_builder();
    let a = Node::new(NodeKind::Class, Point::ORIGIN);
    let b = Node::new(NodeKind::Class, Point::ORIGIN);
    let c = Node::new(NodeKind::Class, Point::ORIGIN);
    for node in [&a, &b, &c] {
        builder.add_node(node).unwrap();
    }

    builder.diagram().bring_to_front(&a).unwrap();
    assert_eq!(builder.diagram().roots(), vec![b.clone(), c.clone(), a.clone()]);
    builder.diagram().send_to_back(&c).unwrap();
    assert_eq!(builder.diagram().roots(), vec![c, b, a]);
    assert!(builder.diagram().check().is_ok());
}

#[test]
fn test_duplicate_uses_configured_offset() {
    let config = BuilderConfig::new(true, Offset::new(0, 40));
    let builder = DiagramBuilder::with_config(Diagram::new(DiagramType::Sequence), config);
    let lifeline = ParentNode::new(NodeKind::ImplicitParameter, Point::new(50, 0)).unwrap();
    let call = Node::new(NodeKind::Call, Point::new(50, 20));
    builder.add_node(&lifeline).unwrap();
    builder.add_child(&lifeline, &call).unwrap();

    let copy = builder.duplicate(&call).unwrap();
    assert_eq!(copy.position(), Point::new(50, 60));
    assert_eq!(copy.parent().unwrap(), lifeline);
    assert_eq!(copy.diagram().as_ref(), Some(builder.diagram()));
    assert_eq!(lifeline.children(), vec![call, copy]);
}

#[test]
fn test_duplicate_outside_diagram_is_refused() {
    let builder = class_builder();
    let loose = Node::new(NodeKind::Class, Point::ORIGIN);
    assert_eq!(
        builder.duplicate(&loose).unwrap_err(),
        ModelError::NotInDiagram { node: loose.id() }
    );
}

#[test]
fn test_removed_subtree_can_move_to_another_diagram() {
    let first = class_builder();
    let second = class_builder();
    let package = ParentNode::new(NodeKind::Package, Point::ORIGIN).unwrap();
    let class = Node::new(NodeKind::Class, Point::ORIGIN);
    first.add_node(&package).unwrap();
    first.add_child(&package, &class).unwrap();

    first.remove_node(&package).unwrap();
    second.add_node(&package).unwrap();

    assert!(first.diagram().is_empty());
    assert_eq!(class.diagram().as_ref(), Some(second.diagram()));
    assert!(second.diagram().check().is_ok());
}

#[test]
fn test_bounds_cover_subtree() {
    let builder = class_builder();
    let package = ParentNode::new(NodeKind::Package, Point::ORIGIN).unwrap();
    builder.add_node(&package).unwrap();
    builder
        .add_child(&package, &Node::new(NodeKind::Class, Point::new(50, 30)))
        .unwrap();

    let bounds = package.bounds((20, 10));
    assert_eq!(bounds.origin, Point::ORIGIN);
    assert_eq!((bounds.width, bounds.height), (70, 40));
}

#[test]
fn test_add_node_refuses_half_linked_subtree() {
    let builder = class_builder();
    let package = ParentNode::new(NodeKind::Package, Point::ORIGIN).unwrap();
    let class = Node::new(NodeKind::Class, Point::ORIGIN);
    // Owning side only; the back-reference is never set
    package.add_child(&class).unwrap();

    assert_eq!(
        builder.add_node(&package).unwrap_err(),
        ModelError::Inconsistent(Violation::OrphanedChild {
            parent: package.id(),
            child: class.id()
        })
    );
    assert!(builder.diagram().is_empty());
    assert!(package.diagram().is_none());
    assert!(class.diagram().is_none());
}

#[test]
fn test_add_child_refuses_half_linked_nested_subtree() {
    let builder = class_builder();
    let outer = ParentNode::new(NodeKind::Package, Point::ORIGIN).unwrap();
    builder.add_node(&outer).unwrap();

    let middle = ParentNode::new(NodeKind::Package, Point::ORIGIN).unwrap();
    let inner = ParentNode::new(NodeKind::Package, Point::ORIGIN).unwrap();
    let class = Node::new(NodeKind::Class, Point::ORIGIN);
    inner.set_parent(&middle).unwrap();
    middle.add_child(&inner).unwrap();
    inner.add_child(&class).unwrap();
    let before = builder.diagram().snapshot();

    assert!(!builder.can_add_child(&outer, &middle));
    assert!(matches!(
        builder.add_child(&outer, &middle).unwrap_err(),
        ModelError::Inconsistent(Violation::OrphanedChild { .. })
    ));
    assert!(!middle.has_parent());
    assert_eq!(builder.diagram().snapshot(), before);
}

#[test]
fn test_add_node_refuses_subtree_holding_existing_member() {
    let builder = class_builder();
    let class = Node::new(NodeKind::Class, Point::ORIGIN);
    builder.add_node(&class).unwrap();

    let package = ParentNode::new(NodeKind::Package, Point::ORIGIN).unwrap();
    package.add_child(&class).unwrap();

    assert_eq!(
        builder.add_node(&package).unwrap_err(),
        ModelError::AlreadyAttached {
            node: class.id(),
            diagram: builder.diagram().id()
        }
    );
    assert_eq!(builder.diagram().roots(), vec![class.clone()]);
    assert!(package.diagram().is_none());
}

#[test]
fn test_add_node_refuses_fully_linked_subtree_holding_existing_member() {
    let builder = class_builder();
    let class = Node::new(NodeKind::Class, Point::ORIGIN);
    builder.add_node(&class).unwrap();

    let package = ParentNode::new(NodeKind::Package, Point::ORIGIN).unwrap();
    class.set_parent(&package).unwrap();
    package.add_child(&class).unwrap();

    assert!(matches!(
        builder.add_node(&package).unwrap_err(),
        ModelError::AlreadyAttached { .. }
    ));
    assert_eq!(builder.diagram().root_count(), 1);
}
