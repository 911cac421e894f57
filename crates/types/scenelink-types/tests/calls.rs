use std::sync::Arc;

use scenelink_bridge_core::mock::shared_mock;
use scenelink_bridge_core::{MockBridge, Request, ScalarKind, Value, ValueKind};
use scenelink_test_fixtures::scenes;
use scenelink_types::*;

fn path(s: &str) -> AccessorPath {
    AccessorPath::parse(s).unwrap()
}

fn scene(name: &str) -> (Arc<MockBridge>, SharedBridge) {
    shared_mock(MockBridge::from_scene_json(&scenes::json(name).unwrap()).unwrap())
}

fn last_call(mock: &MockBridge) -> (AccessorPath, CallOptions, ValueKind) {
    match mock.requests().last().cloned() {
        Some(Request::Call {
            path,
            options,
            returns,
        }) => (path, options, returns),
        other => panic!("expected a call, got {other:?}"),
    }
}

#[test]
fn collection_indexing_and_iteration() {
    let (mock, bridge) = scene("object");
    let obj: Object = bind(&bridge, path("obj"));
    let modifiers = obj.modifiers();
    assert!(mock.requests().is_empty());

    assert_eq!(modifiers.len().unwrap(), 2);
    let second = modifiers.get(1);
    assert_eq!(second.to_string(), "obj.modifiers[1]");
    assert_eq!(second.r#type().unwrap(), ModifierType::Array);

    let array: ArrayModifier = second.cast();
    assert_eq!(array.count().unwrap(), 4);
    assert_eq!(array.relative_offset_displace().unwrap(), [1.0, 0.0, 0.0]);

    let names: Vec<String> = modifiers
        .iter()
        .unwrap()
        .map(|m| m.name().unwrap())
        .collect();
    assert_eq!(names, vec!["Bevel", "Array"]);

    let keyed = modifiers.by_key("Bevel");
    assert_eq!(keyed.path(), &path("obj.modifiers[\"Bevel\"]"));
    assert_eq!(
        format!("{modifiers:?}"),
        "ObjectModifiers<Modifier>(obj.modifiers)"
    );
}

#[test]
fn collection_operations_are_bound_at_the_base_path() {
    let (mock, bridge) = scene("object");
    let obj: Object = bind(&bridge, path("obj"));
    let modifiers = obj.modifiers();

    let created = modifiers
        .new(ObjectModifiersNewOptions {
            name: Some("Bevel.001".into()),
            r#type: Some(ModifierType::Bevel),
        })
        .unwrap();
    assert_eq!(created.path(), &path("obj.modifiers.new"));
    let (call_path, options, returns) = last_call(&mock);
    assert_eq!(call_path, path("obj.modifiers.new"));
    assert_eq!(returns, ValueKind::Object);
    assert_eq!(
        options.iter().collect::<Vec<_>>(),
        vec![
            ("name", &Value::text("Bevel.001")),
            ("type", &Value::Enum("BEVEL".into())),
        ]
    );

    let first = modifiers.get(0);
    modifiers
        .remove(ObjectModifiersRemoveOptions {
            modifier: Some(first),
        })
        .unwrap();
    let (call_path, options, returns) = last_call(&mock);
    assert_eq!(call_path, path("obj.modifiers.remove"));
    assert_eq!(returns, ValueKind::Void);
    assert_eq!(
        options.get("modifier"),
        Some(&Value::Object(path("obj.modifiers[0]")))
    );

    modifiers
        .r#move(ObjectModifiersMoveOptions {
            from_index: Some(1),
            ..Default::default()
        })
        .unwrap();
    let (call_path, options, _) = last_call(&mock);
    assert_eq!(call_path, path("obj.modifiers.move"));
    assert_eq!(options.len(), 1);
    assert_eq!(options.get("from_index"), Some(&Value::Int(1)));

    modifiers.clear().unwrap();
    let (call_path, options, _) = last_call(&mock);
    assert_eq!(call_path, path("obj.modifiers.clear"));
    assert!(options.is_empty());
}

#[test]
fn scalar_and_array_returns() {
    let (mock, bridge) = scene("fcurve");
    let root = scenes::root("fcurve").unwrap().unwrap();
    let fc: FCurve = bind(&bridge, path(&root));

    mock.on_call(path("action.fcurves[0].evaluate"), |opts| {
        match opts.get("frame") {
            Some(Value::Float(frame)) => Ok(Value::Float(frame / 24.0)),
            _ => Ok(Value::Float(0.0)),
        }
    });
    mock.on_call(path("action.fcurves[0].range"), |_| {
        Ok(Value::FloatArray(vec![1.0, 48.0]))
    });

    let value = fc
        .evaluate(FCurveEvaluateOptions { frame: Some(12.0) })
        .unwrap();
    assert_eq!(value, 0.5);
    assert_eq!(last_call(&mock).2, ValueKind::Float);

    assert_eq!(fc.range().unwrap(), [1.0, 48.0]);
    assert_eq!(
        last_call(&mock).2,
        ValueKind::Array {
            item: ScalarKind::Float,
            len: 2
        }
    );

    fc.update().unwrap();
    assert_eq!(last_call(&mock).0, path("action.fcurves[0].update"));
}

#[test]
fn remote_failures_are_returned_as_is() {
    let (_mock, bridge) = scene("fcurve");
    let fc: FCurve = bind(&bridge, path("action.fcurves[0]"));
    assert!(matches!(
        fc.evaluate(FCurveEvaluateOptions::default()),
        Err(BridgeError::Remote { .. })
    ));
}

#[test]
fn keyframe_insert_returns_instance_at_call_path() {
    let (mock, bridge) = scene("fcurve");
    let fc: FCurve = bind(&bridge, path("action.fcurves[0]"));
    let points = fc.keyframe_points();
    assert_eq!(points.len().unwrap(), 3);

    let flags: EnumSet<KeyframeInsertFlags> =
        [KeyframeInsertFlags::Fast, KeyframeInsertFlags::Needed]
            .into_iter()
            .collect();
    let key = points
        .insert(FCurveKeyframePointsInsertOptions {
            frame: Some(60.0),
            value: Some(1.25),
            options: Some(flags),
            keyframe_type: Some(KeyframeType::Breakdown),
        })
        .unwrap();
    assert_eq!(
        key.path(),
        &path("action.fcurves[0].keyframe_points.insert")
    );

    let (_, options, _) = last_call(&mock);
    assert_eq!(options.get("frame"), Some(&Value::Float(60.0)));
    assert_eq!(
        options.get("options"),
        Some(&Value::EnumSet(vec!["FAST".into(), "NEEDED".into()]))
    );
    assert_eq!(
        options.get("keyframe_type"),
        Some(&Value::Enum("BREAKDOWN".into()))
    );

    let last = points.get(2);
    assert_eq!(last.co().unwrap(), [48.0, 0.5]);
    assert_eq!(
        last.interpolation().unwrap(),
        KeyframeInterpolation::Constant
    );
}

#[test]
fn driver_variables_without_options() {
    let (mock, bridge) = shared_mock(MockBridge::new());
    let fc: FCurve = bind(&bridge, path("obj.animation_data.drivers[0]"));
    mock.preset(
        path("obj.animation_data.drivers[0].driver"),
        Value::Object(path("obj.animation_data.drivers[0].driver")),
    );
    let driver = fc.driver().unwrap().unwrap();
    driver.set_type(DriverType::Scripted).unwrap();
    driver.set_expression("var * 2").unwrap();

    let var = driver.variables().new().unwrap();
    assert_eq!(
        var.path(),
        &path("obj.animation_data.drivers[0].driver.variables.new")
    );
    let (_, options, _) = last_call(&mock);
    assert!(options.is_empty());

    let bound = driver.variables().get(0);
    let target = bound.targets().get(0);
    assert_eq!(
        target.to_string(),
        "obj.animation_data.drivers[0].driver.variables[0].targets[0]"
    );
    target.set_transform_type(TransformChannel::RotW).unwrap();
    assert_eq!(
        mock.peek(&path(
            "obj.animation_data.drivers[0].driver.variables[0].targets[0].transform_type"
        )),
        Some(Value::Enum("ROT_W".into()))
    );
}

#[test]
fn node_sockets_through_specialized_collections() {
    let (mock, bridge) = shared_mock(MockBridge::new());
    let node: Node = bind(&bridge, path("tree.nodes[\"Math\"]"));

    let socket = node
        .inputs()
        .new(NodeInputsNewOptions {
            r#type: Some("NodeSocketFloat".into()),
            name: Some("Factor".into()),
            identifier: None,
        })
        .unwrap();
    assert_eq!(socket.to_string(), "tree.nodes[\"Math\"].inputs.new");

    let value: NodeSocketFloat = node.inputs().get(0).cast();
    value.set_default_value(0.25).unwrap();
    assert_eq!(value.default_value().unwrap(), 0.25);

    node.outputs().clear().unwrap();
    node.socket_value_update().unwrap();
    let ops: Vec<&str> = mock.requests().iter().map(Request::op).collect();
    assert_eq!(ops, vec!["call", "set", "get", "call", "call"]);
}

#[test]
fn movie_clip_reload_and_proxy_settings() {
    let (mock, bridge) = shared_mock(MockBridge::new());
    let clip: MovieClip = bind(&bridge, path("data.movieclips[\"shot\"]"));
    clip.reload().unwrap();
    let proxy = clip.proxy().unwrap();
    proxy.set_build_25(true).unwrap();
    proxy.set_quality(90).unwrap();
    proxy.set_timecode(MovieClipProxyTimecode::FreeRunNoGaps).unwrap();

    assert_eq!(
        mock.requests().paths(),
        vec![
            "data.movieclips[\"shot\"].reload",
            "data.movieclips[\"shot\"].proxy",
            "data.movieclips[\"shot\"].proxy.build_25",
            "data.movieclips[\"shot\"].proxy.quality",
            "data.movieclips[\"shot\"].proxy.timecode",
        ]
    );
}
