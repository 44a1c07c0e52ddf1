use super::*;

#[test]
fn test_kind_table_is_dense() {
    for (i, kind) in NodeKind::ALL.iter().enumerate() {
        assert_eq!(kind.index(), i);
    }
    assert!(NodeKind::COUNT <= 64, "KindSet is a u64 bitset");
}

#[test]
fn test_kind_set_membership() {
    let set = KindSet::of(NodeKind::MethodCall).with(NodeKind::New);
    assert!(set.has(NodeKind::MethodCall));
    assert!(set.has(NodeKind::New));
    assert!(!set.has(NodeKind::Block));
    assert_eq!(
        set.kinds().collect::<Vec<_>>(),
        vec![NodeKind::MethodCall, NodeKind::New]
    );
    let collected: KindSet = [NodeKind::New, NodeKind::MethodCall].into_iter().collect();
    assert_eq!(collected, set);
}

#[test]
fn test_properties_in_source_order() {
    let data = NodeData::MethodCall {
        target: Some(NodeId::new(0)),
        name: NodeId::new(1),
        args: vec![NodeId::new(2), NodeId::new(3)],
    };
    let props: Vec<Property> = data.properties().into_iter().map(|(p, _)| p).collect();
    assert_eq!(
        props,
        vec![Property::Target, Property::Name, Property::Arguments]
    );
    assert_eq!(
        data.child_ids(),
        vec![NodeId::new(0), NodeId::new(1), NodeId::new(2), NodeId::new(3)]
    );
}

#[test]
fn test_child_mut_matches_properties() {
    let mut data = NodeData::If {
        cond: NodeId::new(0),
        then_branch: NodeId::new(1),
        else_branch: None,
    };
    let props: Vec<Property> = data.properties().into_iter().map(|(p, _)| p).collect();
    for prop in props {
        assert!(data.child_mut(prop).is_some(), "{prop:?} not addressable");
    }
    if let Some(ChildMut::Optional(slot)) = data.child_mut(Property::Else) {
        *slot = Some(NodeId::new(2));
    }
    assert_eq!(data.child(Property::Else), Some(ChildRef::Optional(Some(NodeId::new(2)))));
    assert!(data.child_mut(Property::Arguments).is_none());
}

#[test]
fn test_statement_classification() {
    assert!(NodeKind::While.is_statement());
    assert!(NodeKind::Return.is_exit());
    assert!(NodeKind::Throw.is_exit());
    assert!(!NodeKind::MethodCall.is_statement());
    assert!(NodeKind::FieldDecl.is_declaration());
    assert!(NodeKind::ArrayType.is_type());
}

#[test]
fn test_map_children_visits_every_slot() {
    let mut data = NodeData::For {
        init: vec![NodeId::new(1)],
        cond: Some(NodeId::new(2)),
        update: vec![NodeId::new(3), NodeId::new(4)],
        body: NodeId::new(5),
    };
    data.map_children(|id| NodeId::new(id.raw() * 10));
    assert_eq!(
        data.child_ids(),
        vec![
            NodeId::new(10),
            NodeId::new(20),
            NodeId::new(30),
            NodeId::new(40),
            NodeId::new(50)
        ]
    );
}
