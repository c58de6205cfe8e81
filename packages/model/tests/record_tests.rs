//! Loading stored proposal records

use anyhow::Result;
use proposal_model::{
    BlockKind, IdGenerator, ModelError, ProposalDefaults, ProposalRecord, Template, DEFAULT_PROPOSAL_NAME,
};
use serde_json::json;

fn ids() -> IdGenerator {
    IdGenerator::from_seed("r".to_string())
}

fn record(value: serde_json::Value) -> Result<ProposalRecord> {
    Ok(serde_json::from_value(value)?)
}

#[test]
fn test_flat_blocks_are_wrapped_in_one_section() -> Result<()> {
    let record = record(json!({
        "id": "p1",
        "name": "Website redesign",
        "client_name": "Acme",
        "sections": [],
        "blocks": [
            { "id": "a", "type": "richText", "content": { "type": "doc", "content": [] } },
            { "id": "b", "type": "columns", "content": {
                "layout": [30.0, 70.0],
                "columns": [{ "id": "c0", "blocks": [] }, { "id": "c1", "blocks": [] }]
            } }
        ]
    }))?;

    let proposal = record.into_proposal(&mut ids(), &ProposalDefaults::default())?;
    let sections = proposal.sections.sections();

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].id, "r-1");
    assert_eq!(proposal.sections.ids(), vec!["a", "b", "c0", "c1"]);
    assert_eq!(sections[0].blocks[1].columns().map(|c| c.layout.clone()), Some(vec![30.0, 70.0]));
    assert_eq!(proposal.client_name, "Acme");

    Ok(())
}

#[test]
fn test_empty_record_gets_default_content() -> Result<()> {
    let proposal = record(json!({}))?.into_proposal(&mut ids(), &ProposalDefaults::default())?;

    assert_eq!(proposal.name, DEFAULT_PROPOSAL_NAME);
    assert_eq!(proposal.client_name, "");
    assert_eq!(proposal.global_styles, ProposalDefaults::default().global_styles);
    assert_eq!(proposal.sections.sections().len(), 1);
    assert_eq!(proposal.sections.sections()[0].blocks[0].kind, BlockKind::RichText);

    Ok(())
}

#[test]
fn test_sections_win_over_legacy_blocks() -> Result<()> {
    let record = record(json!({
        "sections": [{ "id": "s", "blocks": [{ "id": "kept", "type": "divider", "content": {} }] }],
        "blocks": [{ "id": "ignored", "type": "divider", "content": {} }]
    }))?;

    let proposal = record.into_proposal(&mut ids(), &ProposalDefaults::default())?;
    assert_eq!(proposal.sections.ids(), vec!["kept"]);

    Ok(())
}

#[test]
fn test_layout_mismatch_is_rejected() -> Result<()> {
    let record = record(json!({
        "sections": [{ "id": "s", "blocks": [{ "id": "cols", "type": "columns", "content": {
            "layout": [100.0],
            "columns": [{ "id": "c0", "blocks": [] }, { "id": "c1", "blocks": [] }]
        } }] }]
    }))?;

    let err = record.into_proposal(&mut ids(), &ProposalDefaults::default()).unwrap_err();
    assert_eq!(
        err,
        ModelError::LayoutMismatch {
            block_id: "cols".to_string(),
            layout: 1,
            columns: 2,
        }
    );

    Ok(())
}

#[test]
fn test_malformed_blocks_fail_to_parse() {
    let unknown_kind = record(json!({
        "blocks": [{ "id": "x", "type": "carousel", "content": {} }]
    }));
    assert!(unknown_kind.is_err());

    let bad_columns = record(json!({
        "blocks": [{ "id": "x", "type": "columns", "content": { "html": "" } }]
    }));
    assert!(bad_columns.is_err());
}

#[test]
fn test_template_from_json() -> Result<()> {
    let template: Template = serde_json::from_value(json!({
        "name": "Starter",
        "sections": [{ "id": "t1", "blocks": [{ "id": "tb", "type": "button", "content": { "text": "Go", "url": "" } }] }]
    }))?;

    assert!(template.global_styles.is_empty());
    assert_eq!(template.sections.block_count(), 1);

    Ok(())
}

#[test]
fn test_dotted_ids_are_rejected() -> Result<()> {
    let record = record(json!({
        "sections": [{ "id": "s", "blocks": [{ "id": "a.b", "type": "columns", "content": {
            "layout": [100],
            "columns": [{ "id": "c0", "blocks": [] }]
        } }] }]
    }))?;

    let err = record.into_proposal(&mut ids(), &ProposalDefaults::default()).unwrap_err();
    assert_eq!(err, ModelError::InvalidId("a.b".to_string()));

    Ok(())
}

#[test]
fn test_migrated_section_id_skips_loaded_ids() -> Result<()> {
    // Written by an earlier run with the same seed
    let record = record(json!({
        "blocks": [
            { "id": "r-1", "type": "divider", "content": {} },
            { "id": "r-2", "type": "spacer", "content": { "height": 8 } }
        ]
    }))?;

    let proposal = record.into_proposal(&mut ids(), &ProposalDefaults::default())?;

    assert_eq!(proposal.sections.sections()[0].id, "r-3");
    assert_eq!(proposal.id, "r-4");
    assert_eq!(proposal.sections.validate(), Ok(()));

    Ok(())
}
