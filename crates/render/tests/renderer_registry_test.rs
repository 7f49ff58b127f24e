use peek_protocol::{
    Class, DataElement, DataRoot, DataValue, Element, InspectionResult, Method, Module, Provenance,
    ResultKind,
};
use peek_render::{CodeTextRenderer, DataTextRenderer, RenderLimits, Renderer};
use std::collections::BTreeMap;

fn renderers(limits: RenderLimits) -> BTreeMap<&'static str, Box<dyn Renderer>> {
    let mut map: BTreeMap<&'static str, Box<dyn Renderer>> = BTreeMap::new();
    let code = CodeTextRenderer::new(limits);
    let data = DataTextRenderer::new(limits);
    map.insert(code.name(), Box::new(code));
    map.insert(data.name(), Box::new(data));
    map
}

#[test]
fn test_dispatch_by_format_name() {
    let renderers = renderers(RenderLimits::default());
    assert_eq!(
        renderers.keys().copied().collect::<Vec<_>>(),
        vec!["json-text", "text"]
    );

    let module = InspectionResult::single(
        "empty",
        ResultKind::Module,
        Element::Module(Module::new("empty", "")),
    );
    assert_eq!(renderers["text"].render(&module).unwrap(), "empty (module)\n==============\n");
    assert!(renderers["json-text"].render(&module).is_err());
}

#[test]
fn test_custom_limits_apply() {
    let limits = RenderLimits {
        max_array_items: 2,
        max_display_depth: 2,
        ..Default::default()
    };
    let renderers = renderers(limits);

    let inner = DataValue::Array(
        (0..4)
            .map(|i| DataElement::new(format!("[{i}]"), DataValue::Number(i.into())))
            .collect(),
    );
    let mut children = BTreeMap::new();
    children.insert("values".to_string(), DataElement::new("values", inner));
    let root = DataRoot {
        name: "cfg.json".to_string(),
        path: "cfg.json".to_string(),
        element: DataElement::new("cfg.json", DataValue::Object(children)),
    };
    let result = InspectionResult::single("cfg.json", ResultKind::Json, Element::Data(root));

    let text = renderers["json-text"].render(&result).unwrap();
    assert!(text.contains("  values: [\n    [0]: 0\n    [1]: 1\n    ... (2 more items)\n  ]"));
}

#[test]
fn test_methods_never_show_docstrings_inside_class() {
    let mut class = Class::new("Job");
    class.provenance = Provenance::from_scopes("jobs.base", "jobs");
    let mut run = Method::new("run");
    run.docstring = "Run the job.".to_string();
    class.methods.push(run);

    let result = InspectionResult::single("jobs.Job", ResultKind::Class, Element::Class(class));
    let text = CodeTextRenderer::default().render(&result).unwrap();
    assert!(text.contains("class Job [imported from jobs.base]"));
    assert!(text.contains("    def run()"));
    assert!(!text.contains("Run the job."));
}
