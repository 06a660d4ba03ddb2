//! OCCI core tests: mixin operations.

use futures_util::future::LocalBoxFuture;
use rand::seq::SliceRandom;

use crate::client::{ClientError, OcciRequest};
use crate::modules::{IPNETWORK_SCHEME, QUERY_INTERFACE, TENT_MIXIN_SCHEME};
use crate::occi::{Category, Structure};
use crate::registry::{ModuleGroup, Param, TestModule};
use crate::tester::{Args, Assertions, Context, Signal, TestResult, Value};

const NAME: &str = "core_mixin";

pub const GROUP: ModuleGroup = ModuleGroup {
    name: NAME,
    doc: Some("OCCI core tests: Mixin-related operations."),
    modules: &[
        TestModule::new(NAME, "addMixin", add_mixin)
            .doc("Add mixin.")
            .params(&[Param::optional("mixin", Some("Custom mixin to add"))])
            .returns("Created mixin"),
        TestModule::new(NAME, "addProviderMixin", add_provider_mixin)
            .doc("Try to add a provider defined mixin, is supposed to fail."),
        TestModule::new(NAME, "addCollidingMixin", add_colliding_mixin)
            .doc("Try adding a mixin that already exists."),
        TestModule::new(NAME, "removeMixin", remove_mixin)
            .doc("Remove mixin.")
            .params(&[Param::required("mixin", Some("Mixin to remove"))]),
        TestModule::new(NAME, "removeProviderMixin", remove_provider_mixin)
            .doc("Try to remove a provider defined mixin, is supposed to fail."),
        TestModule::new(NAME, "removeNonExistentMixin", remove_non_existent_mixin)
            .doc("Try to remove a mixin that does not exist."),
    ],
};

/// HTTP 403: Forbidden.
const FORBIDDEN: u16 = 403;

fn tent_mixin(term: &str, location: &str) -> Category {
    let mut mixin = Category::mixin(term, TENT_MIXIN_SCHEME);
    mixin.title = Some("OCCI tent test mixin".to_string());
    mixin.location = Some(format!("/occi-tent/{}/", location));
    mixin
}

/// The only provider defined mixin known to exist.
fn provider_mixin() -> Category {
    Category::mixin("ipnetwork", IPNETWORK_SCHEME)
}

/// Mixin argument, validated.
fn mixin_argument(t: &Context, args: &Args) -> Result<Option<Category>, Signal> {
    match args.category("mixin")? {
        Some(mixin) if !mixin.is_mixin() => t.fail("Invalid mixin argument."),
        mixin => Ok(mixin),
    }
}

/// Send a request the server must refuse with 403.
async fn expect_forbidden(
    t: &mut Context,
    request: OcciRequest,
    mixin: &Category,
    done: &str,
    message: &str,
) -> TestResult {
    match t.request(request).await {
        Err(ClientError::Status(e)) => {
            t.assert_equal(e.status, FORBIDDEN, None)?;
            Ok(Value::Null)
        }
        Err(e) => Err(e.into()),
        Ok(_) => {
            t.log(format_args!("{} {}", done, mixin));
            t.fail(message)
        }
    }
}

fn add_mixin(t: &mut Context, args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let mixin = match mixin_argument(t, &args)? {
            Some(mixin) => mixin,
            None => tent_mixin("tent_test_mixin", "tent_custom_mixin"),
        };

        let rsp = t
            .request(OcciRequest::post(QUERY_INTERFACE).header(mixin.clone()))
            .await?;
        t.assert_equal(rsp.status, 200, None)?;
        t.log(format_args!("Mixin created: {}", mixin));
        Ok(mixin.into())
    })
}

fn add_provider_mixin(t: &mut Context, _args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let mixin = provider_mixin();
        let request = OcciRequest::post(QUERY_INTERFACE).header(mixin.clone());
        expect_forbidden(
            t,
            request,
            &mixin,
            "Mixin created:",
            "Mixin was created although it is a provider-defined mixin.",
        )
        .await
    })
}

fn add_colliding_mixin(t: &mut Context, _args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let query = t.request(OcciRequest::get(QUERY_INTERFACE)).await?;
        let mixins: Vec<&Category> = query
            .structures()
            .into_iter()
            .filter_map(Structure::as_category)
            .filter(|c| c.is_mixin())
            .collect();

        let mixin = match mixins.choose(&mut rand::thread_rng()) {
            Some(mixin) => (*mixin).clone(),
            None => return t.skip("The server defines no mixin to collide with."),
        };

        let request = OcciRequest::post(QUERY_INTERFACE).header(mixin.clone());
        expect_forbidden(
            t,
            request,
            &mixin,
            "Mixin created:",
            "Mixin was created although it was already existing.",
        )
        .await
    })
}

fn remove_mixin(t: &mut Context, args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let mixin = match mixin_argument(t, &args)? {
            Some(mixin) => mixin.identity(),
            None => return t.fail("Missing mixin argument."),
        };

        let rsp = t
            .request(OcciRequest::delete(QUERY_INTERFACE).header(mixin.clone()))
            .await?;
        t.assert_equal(rsp.status, 200, None)?;
        t.log(format_args!("Mixin removed: {}", mixin));
        Ok(Value::Null)
    })
}

fn remove_provider_mixin(t: &mut Context, _args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let mixin = provider_mixin();
        let request = OcciRequest::delete(QUERY_INTERFACE).header(mixin.clone());
        expect_forbidden(
            t,
            request,
            &mixin,
            "Mixin removed:",
            "Mixin was removed although it is a provider-defined mixin.",
        )
        .await
    })
}

fn remove_non_existent_mixin(t: &mut Context, _args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let term = format!(
            "tent_test_mixin_that_should_not_exist_anywhere_{}",
            rand::random::<u32>()
        );
        let mixin = tent_mixin(&term, &term);
        let request = OcciRequest::delete(QUERY_INTERFACE).header(mixin.clone());
        expect_forbidden(
            t,
            request,
            &mixin,
            "Mixin removed:",
            "Mixin was removed although it was very unlikely that it existed.",
        )
        .await
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tent_mixin_rendering() {
        let mixin = tent_mixin("tent_test_mixin", "tent_custom_mixin");
        assert_eq!(
            mixin.to_string(),
            "Category: tent_test_mixin; scheme=\"http://example.com/occi-tent/tent_custom_mixin#\"; class=\"mixin\"; title=\"OCCI tent test mixin\"; location=\"/occi-tent/tent_custom_mixin/\""
        );
    }

    #[test]
    fn test_mixin_argument_rejects_kinds() {
        use crate::config::ServerConfig;
        use std::collections::BTreeMap;

        let t = Context::new(crate::client::OcciClient::new(&ServerConfig::default()).unwrap());
        let mut values = BTreeMap::new();
        values.insert(
            "mixin".to_string(),
            Value::from(Category::kind("compute", "http://schemas.ogf.org/occi/infrastructure#")),
        );

        assert_eq!(
            mixin_argument(&t, &Args::new(values)),
            Err(Signal::failure("Invalid mixin argument."))
        );
        assert_eq!(mixin_argument(&t, &Args::default()), Ok(None));
    }
}
