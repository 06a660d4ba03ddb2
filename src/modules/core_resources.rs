//! OCCI core tests: resource operations.

use futures_util::future::LocalBoxFuture;

use crate::client::OcciRequest;
use crate::modules::{required_path, INFRASTRUCTURE_SCHEME};
use crate::occi::{AttributeStructure, Category, Structure};
use crate::registry::{ModuleGroup, Param, TestModule};
use crate::tester::{Args, Assertions, Context, TestResult, Value};

const NAME: &str = "core_resources";

pub const GROUP: ModuleGroup = ModuleGroup {
    name: NAME,
    doc: Some("OCCI core tests: Resource-related operations."),
    modules: &[
        TestModule::new(NAME, "createResource", create_resource)
            .doc("Create a (predefined) resource instance.")
            .returns("URI of created resource instance"),
        TestModule::new(NAME, "retrieveResource", retrieve_resource)
            .doc("Retrieve storage instance.")
            .params(&[Param::required("path", Some("Storage instance path"))]),
        TestModule::new(NAME, "createCustomResource", create_custom_resource)
            .doc("Create a resource instance.")
            .params(&[
                Param::required("kind", Some("Kind to create")),
                Param::optional("structures", Some("Additional structures")),
            ])
            .returns("Created instance"),
    ],
};

fn create_resource(t: &mut Context, _args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let storage = Category::kind("storage", INFRASTRUCTURE_SCHEME);
        let mut attributes = AttributeStructure::new();
        attributes.insert("occi.storage.size", "10");

        let rsp = t
            .request(OcciRequest::post("/storage/").header(storage).header(attributes))
            .await?;
        t.assert_equal(rsp.status, 200, None)?;

        let structures = rsp.structures();
        t.assert_true(!structures.is_empty(), None)?;
        let location = structures[0];
        t.assert_true(
            matches!(location, Structure::Location(_)),
            Some("First response structure is not a location"),
        )?;
        Ok(location.clone().into())
    })
}

fn retrieve_resource(t: &mut Context, args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let path = required_path(t, &args, "path")?;

        let rsp = t.request(OcciRequest::get(path)).await?;
        t.assert_equal(rsp.status, 200, None)?;

        let kind = rsp
            .structures()
            .into_iter()
            .filter_map(Structure::as_category)
            .find(|c| c.is_kind());
        match kind {
            Some(kind) => t.assert_equal(kind.term.as_str(), "storage", None)?,
            None => return t.fail("Response carries no kind."),
        }
        Ok(Value::Null)
    })
}

fn create_custom_resource(t: &mut Context, args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let kind = match args.category("kind")? {
            Some(kind) if kind.is_kind() => kind.identity(),
            Some(_) => return t.fail("Invalid kind argument."),
            None => return t.fail("Missing kind argument."),
        };

        let path = format!("/{}/", kind.term);
        let request = OcciRequest::post(path)
            .header(kind)
            .headers(args.structures("structures")?);

        let rsp = t.request(request).await?;
        t.assert_equal(rsp.status, 200, None)?;

        let structures = rsp.structures();
        t.assert_true(!structures.is_empty(), None)?;
        let created = structures[0].clone();
        t.log(format_args!("Resource created: {}", created));
        Ok(created.into())
    })
}
