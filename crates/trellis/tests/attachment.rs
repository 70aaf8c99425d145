//! Integration tests for node-to-diagram attachment

use trellis::prelude::*;

#[test]
fn test_attachment_is_exclusive() {
    let d1 = Diagram::new(DiagramType::Class);
    let d2 = Diagram::new(DiagramType::Class);
    let node = Node::new(NodeKind::Class, Point::ORIGIN);

    node.attach(&d1).unwrap();
    let err = node.attach(&d2).unwrap_err();

    assert!(err.is_contract_violation());
    assert_eq!(
        err,
        ModelError::AlreadyAttached {
            node: node.id(),
            diagram: d1.id()
        }
    );
    assert_eq!(node.diagram(), Some(d1));
}

#[test]
fn test_detach_then_reattach() {
    let d1 = Diagram::new(DiagramType::Class);
    let d2 = Diagram::new(DiagramType::Sequence);
    let node = Node::new(NodeKind::Note, Point::ORIGIN);

    node.attach(&d1).unwrap();
    node.detach();
    assert!(node.diagram().is_none());

    node.attach(&d1).unwrap();
    assert_eq!(node.diagram().as_ref(), Some(&d1));
    node.detach();

    node.attach(&d2).unwrap();
    assert_eq!(node.diagram().as_ref(), Some(&d2));
}

#[test]
fn test_detach_is_idempotent() {
    let diagram = Diagram::new(DiagramType::Class);
    let node = Node::new(NodeKind::Note, Point::ORIGIN);
    node.detach();
    node.attach(&diagram).unwrap();
    node.detach();
    node.detach();
    assert!(node.diagram().is_none());
}

#[test]
fn test_attach_does_not_touch_root_list() {
    let diagram = Diagram::new(DiagramType::Class);
    let node = Node::new(NodeKind::Class, Point::ORIGIN);
    node.attach(&diagram).unwrap();
    assert!(diagram.is_empty());
    assert!(!diagram.contains(&node));
}

#[test]
fn test_detach_does_not_touch_root_list() {
    let builder = DiagramBuilder::new(Diagram::new(DiagramType::Class));
    let node = Node::new(NodeKind::Class, Point::ORIGIN);
    builder.add_node(&node).unwrap();

    node.detach();
    assert!(builder.diagram().contains_root(&node));
    assert_eq!(
        validate(builder.diagram()),
        vec![Violation::DetachedMember {
            node: node.id(),
            attached: None
        }]
    );
}

#[test]
fn test_every_reachable_node_reports_its_diagram() {
    let builder = DiagramBuilder::new(Diagram::new(DiagramType::Sequence));
    let lifeline = ParentNode::new(NodeKind::ImplicitParameter, Point::ORIGIN).unwrap();
    builder.add_node(&lifeline).unwrap();
    for i in 0..3 {
        let call = Node::new(NodeKind::Call, Point::new(0, 20 * i));
        builder.add_child(&lifeline, &call).unwrap();
    }
    builder
        .add_node(&Node::new(NodeKind::Note, Point::new(200, 0)))
        .unwrap();

    let diagram = builder.diagram();
    assert_eq!(diagram.node_count(), 5);
    for node in diagram.all_nodes() {
        assert_eq!(node.diagram().as_ref(), Some(diagram));
        assert!(diagram.contains(&node));
    }
}

#[test]
fn test_node_outliving_diagram_reports_no_attachment() {
    let node = Node::new(NodeKind::Class, Point::ORIGIN);
    {
        let builder = DiagramBuilder::new(Diagram::new(DiagramType::Class));
        builder.add_node(&node).unwrap();
        assert!(node.diagram().is_some());
    }
    assert!(node.diagram().is_none());
}

#[test]
fn test_builder_refuses_node_attached_elsewhere() {
    let other = Diagram::new(DiagramType::Class);
    let builder = DiagramBuilder::new(Diagram::new(DiagramType::Class));
    let node = Node::new(NodeKind::Class, Point::ORIGIN);
    node.attach(&other).unwrap();

    assert!(matches!(
        builder.add_node(&node).unwrap_err(),
        ModelError::AlreadyAttached { .. }
    ));
    assert!(builder.diagram().is_empty());
    assert_eq!(node.diagram(), Some(other));
}

#[test]
fn test_builder_refuses_subtree_with_foreign_descendant() {
    let other = Diagram::new(DiagramType::Class);
    let builder = DiagramBuilder::new(Diagram::new(DiagramType::Class));
    let package = ParentNode::new(NodeKind::Package, Point::ORIGIN).unwrap();
    let class = Node::new(NodeKind::Class, Point::ORIGIN);
    class.set_parent(&package).unwrap();
    package.add_child(&class).unwrap();
    class.attach(&other).unwrap();

    assert_eq!(
        builder.add_node(&package).unwrap_err(),
        ModelError::ForeignDiagram { node: class.id() }
    );
    assert!(package.diagram().is_none());
}
