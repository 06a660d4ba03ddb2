//! OCCI core tests: namespace path operations.

use futures_util::future::LocalBoxFuture;

use crate::client::{OcciRequest, OcciResponse, CONTENT_TYPE_URI_LIST};
use crate::modules::{check_hierarchy_path, required_path};
use crate::occi::Structure;
use crate::registry::{ModuleGroup, Param, TestModule};
use crate::tester::{Args, Assertions, Context, TestResult, Value};

const NAME: &str = "core_paths";

pub const GROUP: ModuleGroup = ModuleGroup {
    name: NAME,
    doc: Some("OCCI core tests: Namespace path operations."),
    modules: &[
        TestModule::new(NAME, "hierarchyState", hierarchy_state)
            .doc("Retrieve namespace hierarchy state.")
            .params(&[
                Param::required("path", None),
                Param::bool("acceptUriList", Some("Use uri-list accept header"), false),
            ]),
        TestModule::new(NAME, "hasInstances", has_instances)
            .doc("Check that instances exist below path.")
            .params(&[Param::required("path", None)]),
        TestModule::new(NAME, "retrieveInstances", retrieve_instances)
            .doc("Retrieve instances below path.")
            .params(&[Param::required("hierarchyPath", None)]),
        TestModule::new(NAME, "deleteInstances", delete_instances)
            .doc("Delete all instances below path.")
            .params(&[Param::required("hierarchyPath", None)]),
    ],
};

/// URIs listed by a response, either as a uri-list or as location structures.
fn listed_uris(rsp: &OcciResponse) -> Vec<String> {
    if !rsp.uris().is_empty() {
        return rsp.uris().to_vec();
    }
    rsp.structures()
        .into_iter()
        .filter_map(Structure::as_location)
        .flat_map(|location| location.uris.iter().cloned())
        .collect()
}

fn hierarchy_state(t: &mut Context, args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let path = required_path(t, &args, "path")?;
        check_hierarchy_path(t, &path)?;
        let accept_uri_list = args.bool("acceptUriList")?;

        let mut request = OcciRequest::get(path);
        if accept_uri_list {
            request = request.accept(CONTENT_TYPE_URI_LIST);
        }
        let rsp = t.request(request).await?;

        if accept_uri_list {
            t.assert_equal(rsp.content_type().as_deref(), Some(CONTENT_TYPE_URI_LIST), None)?;
        }
        let uris = listed_uris(&rsp);
        t.log(format_args!("{} URIs found.", uris.len()));
        t.assert_true(!uris.is_empty(), None)?;
        Ok(Value::Null)
    })
}

fn has_instances(t: &mut Context, args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let path = required_path(t, &args, "path")?;

        let rsp = t.request(OcciRequest::get(path)).await?;
        t.assert_equal(rsp.status, 200, None)?;
        t.assert_true(!rsp.structures().is_empty(), None)?;
        Ok(Value::Null)
    })
}

fn retrieve_instances(t: &mut Context, args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let path = required_path(t, &args, "hierarchyPath")?;
        check_hierarchy_path(t, &path)?;

        let rsp = t.request(OcciRequest::get(path)).await?;
        t.log(format_args!("{} instances found.", listed_uris(&rsp).len()));
        Ok(Value::Null)
    })
}

fn delete_instances(t: &mut Context, args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let path = required_path(t, &args, "hierarchyPath")?;
        check_hierarchy_path(t, &path)?;

        t.request(OcciRequest::delete(path)).await?;
        Ok(Value::Null)
    })
}
