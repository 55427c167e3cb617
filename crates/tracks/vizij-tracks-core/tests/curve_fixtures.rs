use serde::Deserialize;
use vizij_tracks_core::{
    FloatKind, FloatPointDefinition, PointDefinition, PointKind, ProviderContext, QuaternionKind,
    Value, Vector3Kind, Vector4Kind,
};

#[derive(Debug, Deserialize)]
struct CurveFixture {
    definition: serde_json::Value,
    #[serde(default)]
    providers: Vec<ProviderFixture>,
    samples: Vec<SampleFixture>,
}

#[derive(Debug, Deserialize)]
struct ProviderFixture {
    name: String,
    values: Vec<f32>,
    #[serde(default)]
    quaternion: bool,
}

#[derive(Debug, Deserialize)]
struct SampleFixture {
    time: f32,
    value: Vec<f32>,
    is_last: bool,
}

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn run<K: PointKind>(name: &str, fixture: &CurveFixture, components: impl Fn(K::Output) -> Vec<f32>) {
    let mut ctx = ProviderContext::new();
    for p in &fixture.providers {
        ctx.set(&p.name, p.values.clone(), p.quaternion);
    }
    let value = Value::from(fixture.definition.clone());
    let def = PointDefinition::<K>::parse(&value, &ctx, None)
        .unwrap_or_else(|e| panic!("{name}: {e}"));
    assert_eq!(def.has_base_provider(), !fixture.providers.is_empty(), "{name}");

    for sample in &fixture.samples {
        let (out, is_last) = def.interpolate(sample.time, &ctx);
        let out = components(out);
        assert_eq!(is_last, sample.is_last, "{name} @ {}", sample.time);
        assert_eq!(out.len(), sample.value.len(), "{name}");
        if K::NAME == QuaternionKind::NAME {
            // q and -q encode the same rotation
            let dot: f32 = out.iter().zip(&sample.value).map(|(a, b)| a * b).sum();
            approx(dot.abs(), 1.0, 1e-4);
        } else {
            for (a, b) in out.iter().zip(&sample.value) {
                approx(*a, *b, 1e-4);
            }
        }
    }
}

#[test]
fn shared_curve_fixtures_evaluate_as_recorded() {
    let keys = vizij_test_fixtures::curves::keys().expect("curve fixture manifest");
    assert!(!keys.is_empty());
    for name in keys {
        let fixture: CurveFixture =
            vizij_test_fixtures::curves::load(&name).expect("load curve fixture");
        let kind = vizij_test_fixtures::curves::kind(&name).expect("fixture kind");
        match kind.as_str() {
            "float" => run::<FloatKind>(&name, &fixture, |v| vec![v]),
            "vector3" => run::<Vector3Kind>(&name, &fixture, |v| v.to_vec()),
            "vector4" => run::<Vector4Kind>(&name, &fixture, |v| v.to_vec()),
            "quaternion" => run::<QuaternionKind>(&name, &fixture, |v| v.to_vec()),
            other => panic!("{name}: unknown fixture kind '{other}'"),
        }
    }
}

#[test]
fn fixture_text_matches_value_parse() {
    let ctx = ProviderContext::new();
    let json = vizij_test_fixtures::curves::json("float-ramp").expect("float-ramp fixture");
    let fixture: serde_json::Value = serde_json::from_str(&json).unwrap();
    let text = fixture["definition"].to_string();
    let from_text = FloatPointDefinition::from_json_str(&text, &ctx, None).unwrap();
    let from_value =
        FloatPointDefinition::parse(&Value::from(fixture["definition"].clone()), &ctx, None)
            .unwrap();
    assert_eq!(from_text.to_value(), from_value.to_value());
}
