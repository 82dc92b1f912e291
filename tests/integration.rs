//! Integration tests for pipewright
//!
//! End-to-end tests that assemble, validate and serialize whole
//! pipelines.
//!
mod common;
use common::*;
use pipewright::prelude::*;
use serde_json::json;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_translation_pipeline_end_to_end() {
        init_tracing();
        let (mut pipeline, input, model, output) = translation_pipeline();
        pipeline.validate().expect("pipeline validates");

        let doc = pipeline.serialize();
        assert_eq!(doc.nodes.len(), 3);
        assert_eq!(doc.links.len(), 2);
        assert_eq!(doc.links[0].from, input);
        assert_eq!(doc.links[0].to, model);
        assert_eq!(doc.links[1].from, model);
        assert_eq!(doc.links[1].to, output);

        // The inferred text type shows up on both boundary manifests.
        let json = serde_json::to_value(&doc).expect("document serializes");
        assert_eq!(json["nodes"][0]["dataType"], json!(["text"]));
        assert_eq!(json["nodes"][2]["dataType"], json!(["text"]));
    }

    #[test]
    fn test_missing_output_link_fails_validation() {
        let catalog = MockCatalog;
        let mut pipeline = Pipeline::new();
        let input = pipeline.input().expect("attach input");
        let model = pipeline
            .asset(&catalog, "translate-en-de")
            .expect("resolve asset");
        pipeline
            .link(input, "input", model, "text")
            .expect("link input to model");
        pipeline.output().expect("attach output");

        let err = pipeline.validate().unwrap_err();
        assert_eq!(err.to_string(), "Output node OUTPUT(ID=2) not linked in");
    }

    #[test]
    fn test_prompted_generation_pipeline() {
        let (mut pipeline, _, model, _) = llm_pipeline();
        pipeline
            .node_mut(model)
            .unwrap()
            .set_input("prompt", json!("Answer in {{tone}} tone: {{text}}"))
            .expect("assign prompt");
        pipeline
            .node_mut(model)
            .unwrap()
            .set_input("tone", json!("neutral"))
            .expect("set expanded param");

        pipeline.validate().expect("pipeline validates");

        // The prompt superseded the free-text input.
        let text = pipeline.node(model).unwrap().inputs().get("text").unwrap();
        assert!(!text.is_required());

        let doc = serde_json::to_value(pipeline.serialize()).expect("document serializes");
        let inputs = doc["nodes"][1]["inputValues"]
            .as_array()
            .expect("input values");
        assert!(inputs.iter().any(|p| p["code"] == json!("tone")));
    }

    #[test]
    fn test_script_pipeline_with_uploader() {
        let mut pipeline = Pipeline::new();
        let input = pipeline.input().expect("attach input");
        let script = pipeline
            .script_from_file(&MockUploader, "scripts/clean.py")
            .expect("upload script");
        {
            let node = pipeline.node_mut(script).unwrap();
            node.inputs_mut()
                .create_param("payload", Some(DataType::Text), true)
                .expect("declare script input");
            node.outputs_mut()
                .create_param("result", Some(DataType::Text), false)
                .expect("declare script output");
        }
        pipeline
            .link(input, "input", script, "payload")
            .expect("link input to script");
        pipeline.use_output(script, "result").expect("link script out");

        pipeline.validate().expect("pipeline validates");
        let doc = serde_json::to_value(pipeline.serialize()).expect("document serializes");
        assert_eq!(doc["nodes"][1]["type"], json!("SCRIPT"));
        assert_eq!(doc["nodes"][1]["fileId"], json!("file-scripts/clean.py"));
    }

    #[test]
    fn test_decision_pipeline_records_provenance() {
        let catalog = MockCatalog;
        let mut pipeline = Pipeline::new();
        let input = pipeline.input().expect("attach input");
        let model = pipeline
            .asset(&catalog, "translate-en-de")
            .expect("resolve asset");
        pipeline
            .link(input, "input", model, "text")
            .expect("feed model");

        let decision = pipeline.decision(vec![]).expect("attach decision");
        pipeline
            .link(input, "input", decision, "comparison")
            .expect("link comparison");
        pipeline
            .link(model, "data", decision, "passthrough")
            .expect("link passthrough");
        let output = pipeline
            .use_output(decision, "data")
            .expect("link decision out");

        pipeline.validate().expect("pipeline validates");

        let doc = serde_json::to_value(pipeline.serialize()).expect("document serializes");
        let record = doc["links"]
            .as_array()
            .unwrap()
            .iter()
            .find(|l| l["from"] == json!(decision.0) && l["to"] == json!(output.0))
            .expect("decision edge exists");
        assert_eq!(record["paramMapping"][0]["dataSourceId"], json!(model.0));
    }

    #[test]
    fn test_routed_pipeline_end_to_end() {
        let catalog = MockCatalog;
        let mut pipeline = Pipeline::new();
        let input = pipeline.input().expect("attach input");
        let translate = pipeline
            .asset(&catalog, "translate-en-de")
            .expect("resolve translation");
        let stt = pipeline.asset(&catalog, "speech-rec").expect("resolve stt");

        let router = pipeline
            .route(input, "input", &[(translate, "text"), (stt, "source_audio")])
            .expect("build router");
        pipeline
            .use_output(translate, "data")
            .expect("link translation out");
        pipeline.use_output(stt, "data").expect("link stt out");

        pipeline.validate().expect("pipeline validates");

        let doc = serde_json::to_value(pipeline.serialize()).expect("document serializes");
        let router_doc = doc["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .find(|n| n["type"] == json!("ROUTER"))
            .expect("router node exists");
        let routes = router_doc["routes"].as_array().expect("routes array");
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0]["value"], json!("text"));
        assert_eq!(routes[0]["type"], json!("checkType"));
        assert_eq!(routes[0]["operation"], json!("equal"));
        assert_eq!(routes[0]["path"], json!([translate.0]));
        let _ = router;
    }

    #[test]
    fn test_segmented_audio_pipeline() {
        init_tracing();
        let catalog = MockCatalog;
        let mut pipeline = Pipeline::new();
        let input = pipeline.input().expect("attach input");
        let segmentor = pipeline.segmentor(&catalog, "seg-1").expect("resolve segmentor");
        let stt = pipeline.asset(&catalog, "speech-rec").expect("resolve stt");
        let reconstructor = pipeline
            .reconstructor(&catalog, "recon-1")
            .expect("resolve reconstructor");

        pipeline
            .link(input, "input", segmentor, "source_audio")
            .expect("feed segmentor");
        pipeline
            .link(segmentor, "audio", stt, "source_audio")
            .expect("segments to stt");
        pipeline
            .link(stt, "data", reconstructor, "text")
            .expect("stt to reconstructor");
        pipeline
            .use_output(reconstructor, "data")
            .expect("link reconstructor out");

        pipeline.validate().expect("pipeline validates");

        let doc = serde_json::to_value(pipeline.serialize()).expect("document serializes");
        assert_eq!(doc["nodes"][1]["functionType"], json!("segmentor"));
        assert_eq!(doc["nodes"][3]["functionType"], json!("reconstructor"));
        // The input manifest picked up the audio type from the segmentor.
        assert_eq!(doc["nodes"][0]["dataType"], json!(["audio"]));
    }

    #[test]
    fn test_serialized_document_round_trips() {
        let (pipeline, ..) = translation_pipeline();
        let doc = pipeline.serialize();
        let encoded = serde_json::to_string(&doc).expect("encode document");
        let decoded: PipelineDoc = serde_json::from_str(&encoded).expect("decode document");
        assert_eq!(decoded.nodes.len(), doc.nodes.len());
        assert_eq!(decoded.links.len(), doc.links.len());
        assert_eq!(
            serde_json::to_value(&decoded).unwrap(),
            serde_json::to_value(&doc).unwrap()
        );
    }
}
