use std::sync::Arc;

use scenelink_bridge_core::mock::shared_mock;
use scenelink_bridge_core::{MockBridge, Request, Value, ValueKind};
use scenelink_test_fixtures::scenes;
use scenelink_types::*;

fn path(s: &str) -> AccessorPath {
    AccessorPath::parse(s).unwrap()
}

fn empty() -> (Arc<MockBridge>, SharedBridge) {
    shared_mock(MockBridge::new())
}

fn scene(name: &str) -> (Arc<MockBridge>, SharedBridge) {
    shared_mock(MockBridge::from_scene_json(&scenes::json(name).unwrap()).unwrap())
}

#[test]
fn bevel_width_is_forwarded_verbatim() {
    let (mock, bridge) = scene("bevel");
    let root = scenes::root("bevel").unwrap().unwrap();
    let bevel: BevelModifier = bind(&bridge, path(&root));

    assert!((bevel.width().unwrap() - 0.1).abs() < 1e-6);
    bevel.set_width(2.5).unwrap();
    assert_eq!(bevel.width().unwrap(), 2.5);

    assert_eq!(
        mock.take_requests().into_vec(),
        vec![
            Request::Get {
                path: path("obj.modifiers[0].width"),
                kind: ValueKind::Float
            },
            Request::Set {
                path: path("obj.modifiers[0].width"),
                value: Value::Float(2.5)
            },
            Request::Get {
                path: path("obj.modifiers[0].width"),
                kind: ValueKind::Float
            },
        ]
    );
}

#[test]
fn out_of_range_values_are_not_checked_locally() {
    let (mock, bridge) = empty();
    let bevel: BevelModifier = bind(&bridge, path("obj.modifiers[0]"));
    bevel.set_segments(5000).unwrap();
    bevel.set_width(-1.0).unwrap();
    assert_eq!(bevel.segments().unwrap(), 5000);
    assert_eq!(
        mock.peek(&path("obj.modifiers[0].width")),
        Some(Value::Float(-1.0))
    );
}

#[test]
fn primitive_kinds_round_trip() {
    let (_mock, bridge) = empty();
    let obj: Object = bind(&bridge, path("obj"));

    obj.set_name("Suzanne").unwrap();
    assert_eq!(obj.name().unwrap(), "Suzanne");

    obj.set_hide_viewport(true).unwrap();
    assert!(obj.hide_viewport().unwrap());

    obj.set_pass_index(7).unwrap();
    assert_eq!(obj.pass_index().unwrap(), 7);

    obj.set_location([1.0, -2.0, 0.5]).unwrap();
    assert_eq!(obj.location().unwrap(), [1.0, -2.0, 0.5]);

    let clip: MovieClip = bind(&bridge, path("data.movieclips[\"shot\"]"));
    clip.set_display_aspect([2.0, 1.0]).unwrap();
    assert_eq!(clip.display_aspect().unwrap(), [2.0, 1.0]);
}

#[test]
fn readonly_properties_are_readable() {
    let (mock, bridge) = empty();
    let clip: MovieClip = bind(&bridge, path("clip"));
    mock.preset(path("clip.size"), Value::IntArray(vec![1920, 1080]));
    mock.preset(path("clip.fps"), Value::Float(24.0));
    mock.preset(path("clip.source"), Value::Enum("MOVIE".into()));

    assert_eq!(clip.size().unwrap(), [1920, 1080]);
    assert_eq!(clip.fps().unwrap(), 24.0);
    assert_eq!(clip.source().unwrap(), MovieClipSource::Movie);
}

#[test]
fn enums_use_remote_tokens() {
    let (mock, bridge) = scene("bevel");
    let bevel: BevelModifier = bind(&bridge, path("obj.modifiers[0]"));

    assert_eq!(bevel.affect().unwrap(), BevelAffect::Edges);
    assert_eq!(bevel.limit_method().unwrap(), BevelLimitMethod::Angle);
    assert_eq!(bevel.r#type().unwrap(), ModifierType::Bevel);

    bevel.set_affect(BevelAffect::Vertices).unwrap();
    assert_eq!(
        mock.peek(&path("obj.modifiers[0].affect")),
        Some(Value::Enum("VERTICES".into()))
    );

    mock.preset(
        path("obj.modifiers[0].offset_type"),
        Value::Enum("SIDEWAYS".into()),
    );
    assert!(matches!(
        bevel.offset_type(),
        Err(BridgeError::Decode { .. })
    ));
}

#[test]
fn enum_catalog_metadata() {
    assert_eq!(ModifierType::NAME, "ModifierType");
    assert_eq!(ModifierType::ALL.len(), 3);
    assert_eq!(
        ModifierType::from_token("MESH_SEQUENCE_CACHE"),
        Some(ModifierType::MeshSequenceCache)
    );
    assert_eq!(DriverVariableType::RotationDiff.token(), "ROTATION_DIFF");
    assert_eq!(TransformChannel::ScaleAvg.to_string(), "SCALE_AVG");
    assert_eq!(BevelLimitMethod::from_token("NONE"), Some(BevelLimitMethod::None));
    assert_eq!(MeshSequenceCacheReadData::Vertex.token(), "VERT");
}

#[test]
fn enum_sets_round_trip_sorted() {
    let (mock, bridge) = empty();
    let cache: MeshSequenceCacheModifier = bind(&bridge, path("obj.modifiers[2]"));

    let flags: EnumSet<MeshSequenceCacheReadData> = [
        MeshSequenceCacheReadData::Vertex,
        MeshSequenceCacheReadData::Uv,
    ]
    .into_iter()
    .collect();
    cache.set_read_data(&flags).unwrap();

    assert_eq!(
        mock.peek(&path("obj.modifiers[2].read_data")),
        Some(Value::EnumSet(vec!["UV".into(), "VERT".into()]))
    );
    let back = cache.read_data().unwrap();
    assert_eq!(back, flags);
    assert!(back.contains(&MeshSequenceCacheReadData::Uv));
    assert!(!back.contains(&MeshSequenceCacheReadData::Color));
}

#[test]
fn nullable_string() {
    let (_mock, bridge) = empty();
    let proxy: MovieClipProxy = bind(&bridge, path("clip.proxy"));

    assert_eq!(proxy.directory().unwrap(), None);
    proxy.set_directory(Some("//proxies")).unwrap();
    assert_eq!(proxy.directory().unwrap().as_deref(), Some("//proxies"));
    proxy.set_directory(None).unwrap();
    assert_eq!(proxy.directory().unwrap(), None);
}

#[test]
fn pointers_bind_at_the_attribute_path() {
    let (mock, bridge) = scene("object");
    let obj: Object = bind(&bridge, path("obj"));
    assert!(obj.parent().unwrap().is_none());

    let rig: Object = bind(&bridge, path("data.objects[\"Rig\"]"));
    obj.set_parent(Some(&rig)).unwrap();
    assert_eq!(
        mock.peek(&path("obj.parent")),
        Some(Value::Object(path("data.objects[\"Rig\"]")))
    );
    let parent = obj.parent().unwrap().unwrap();
    assert_eq!(parent.to_string(), "obj.parent");

    let clip: MovieClip = bind(&bridge, path("clip"));
    let proxy = clip.proxy().unwrap();
    assert_eq!(proxy.path(), &path("clip.proxy"));

    let array: ArrayModifier = bind(&bridge, path("obj.modifiers[1]"));
    array.set_end_cap(Some(&rig)).unwrap();
    assert!(array.start_cap().unwrap().is_none());
    assert_eq!(
        array.end_cap().unwrap().map(|o| o.to_string()),
        Some("obj.modifiers[1].end_cap".to_string())
    );
}

#[test]
fn display_and_debug() {
    let (_mock, bridge) = empty();
    let bevel: BevelModifier = bind(&bridge, path("obj.modifiers[0]"));
    assert_eq!(bevel.to_string(), "obj.modifiers[0]");
    assert_eq!(format!("{bevel:?}"), "BevelModifier(obj.modifiers[0])");

    let modifier: Modifier = bevel.clone().into();
    assert_eq!(format!("{modifier:?}"), "Modifier(obj.modifiers[0])");
    assert_eq!(modifier.path(), bevel.path());
}

#[test]
fn derived_types_expose_base_accessors() {
    let (mock, bridge) = scene("bevel");
    let bevel: BevelModifier = bind(&bridge, path("obj.modifiers[0]"));
    assert_eq!(bevel.name().unwrap(), "Bevel");
    assert!(bevel.show_viewport().unwrap());
    bevel.set_show_viewport(false).unwrap();

    let socket: NodeSocketVector = bind(&bridge, path("tree.nodes[0].inputs[1]"));
    socket.set_default_value([0.0, 1.0, 0.0]).unwrap();
    socket.set_hide(true).unwrap();
    assert_eq!(socket.default_value().unwrap(), [0.0, 1.0, 0.0]);

    let paths = mock.requests().paths();
    assert!(paths.contains(&"obj.modifiers[0].show_viewport".to_string()));
    assert!(paths.contains(&"tree.nodes[0].inputs[1].hide".to_string()));
}

#[test]
fn bridge_errors_propagate_unchanged() {
    let (_mock, bridge) = empty();
    let fc: FCurve = bind(&bridge, path("action.fcurves[0]"));
    assert_eq!(
        fc.array_index(),
        Err(BridgeError::InvalidPath {
            path: path("action.fcurves[0].array_index")
        })
    );
}
