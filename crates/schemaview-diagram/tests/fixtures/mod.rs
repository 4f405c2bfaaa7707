//! Test fixtures for diagram integration tests

#![allow(dead_code)]

use schemaview_core::{DatabaseSchema, ForeignKeyEdge, TableSchema};

/// Cluster metadata in the shape eHive ships next to its pipelines
pub const EHIVE_CLUSTERS_JSON: &str = r##"{
    "Pipeline structure": {
        "tables": ["analysis_base", "dataflow_rule", "analysis_ctrl_rule"],
        "table_colour": "#C5E1A5",
        "tone_colour": "#F1F8E9"
    },
    "Job tracking": {
        "tables": ["job", "accu", "analysis_base"],
        "table_colour": "#90CAF9",
        "tone_colour": "#E3F2FD"
    },
    "Resources": {
        "tables": ["resource_class", "resource_description"],
        "table_colour": "",
        "tone_colour": "#FFF3E0"
    }
}"##;

/// Five tables, four foreign keys, one table outside every cluster
pub fn ehive_schema() -> DatabaseSchema {
    DatabaseSchema::try_from_tables(vec![
        TableSchema::new(
            "analysis_base",
            vec![
                "analysis_id".into(),
                "logic_name".into(),
                "module".into(),
                "resource_class_id".into(),
            ],
        )
        .with_foreign_keys(vec![ForeignKeyEdge::new(
            "analysis_base",
            "resource_class_id",
            "resource_class",
            "resource_class_id",
        )]),
        TableSchema::new(
            "dataflow_rule",
            vec!["dataflow_rule_id".into(), "from_analysis_id".into(), "to_analysis_url".into()],
        )
        .with_foreign_keys(vec![ForeignKeyEdge::new(
            "dataflow_rule",
            "from_analysis_id",
            "analysis_base",
            "analysis_id",
        )]),
        TableSchema::new("job", vec!["job_id".into(), "prev_job_id".into(), "analysis_id".into()])
            .with_foreign_keys(vec![
                ForeignKeyEdge::new("job", "prev_job_id", "job", "job_id"),
                ForeignKeyEdge::new("job", "analysis_id", "analysis_base", "analysis_id"),
            ]),
        TableSchema::new("resource_class", vec!["resource_class_id".into(), "name".into()]),
        TableSchema::new("hive_meta", vec!["meta_key".into(), "meta_value".into()]),
    ])
    .expect("fixture tables are unique")
}
