//! JSON presentation of patches fetched over SysEx

use std::sync::Arc;

use blofeld_sdata::{encode, Patch};
use blofeld_sysex::{Blofeld, BlofeldConfig, MockMidiPort};
use blofeld_tests::{init_tracing, script_dump};
use pretty_assertions::assert_eq;

fn sample_patch() -> Patch {
    let mut patch = Patch::named("Glass Bell");
    patch.oscillators[0].shape = 2;
    patch.oscillators[1].detune = 70;
    patch.filters[1].filter_type = 3;
    patch.envelopes[0].release = 90;
    patch.lfos[2].speed = 45;
    patch.effects[0].effect_type = 1;
    patch.effects[0].set_param1(12);
    patch.mod_matrix[15].dest = 9;
    patch.modifiers[3].constant = 64;
    patch.arp_pattern_steps[4] = 1;
    patch.category = Some(5);
    patch
}

#[tokio::test]
async fn test_fetched_patch_json_round_trip() -> anyhow::Result<()> {
    init_tracing();
    let port = Arc::new(MockMidiPort::default());
    script_dump(&port, 0, "E", 64, &sample_patch())?;
    let blofeld = Blofeld::new(port.clone(), BlofeldConfig::default());

    let (fetched, _) = blofeld.request_patch_dump(&*port, "E", 64).await?;

    let json = serde_json::to_string_pretty(&fetched)?;
    let restored: Patch = serde_json::from_str(&json)?;

    // JSON carries no baseline; the sample has no unmodeled bytes set
    assert!(restored.baseline().is_none());
    assert_eq!(encode(&restored), encode(&fetched));
    Ok(())
}

#[test]
fn test_json_field_names() -> anyhow::Result<()> {
    let value = serde_json::to_value(sample_patch())?;

    assert_eq!(value["name"], "Glass Bell");
    assert_eq!(value["filters"][1]["type"], 3);
    assert_eq!(value["effects"][0]["type"], 1);
    assert_eq!(value["effects"][0]["params"][0], 12);
    assert_eq!(value["category"], 5);
    assert!(value.get("subcategory").is_none());
    assert!(value.get("baseline").is_none());
    Ok(())
}

#[test]
fn test_sparse_json_fills_defaults() -> anyhow::Result<()> {
    let patch: Patch = serde_json::from_str(r#"{ "name": "Sparse", "mix_osc1": 127 }"#)?;

    assert_eq!(patch.name, "Sparse");
    assert_eq!(patch.mix_osc1, 127);
    assert_eq!(patch.category, None);

    let sdata = encode(&patch);
    assert_eq!(&sdata[363..369], b"Sparse");
    assert_eq!(sdata[61], 127);
    Ok(())
}
