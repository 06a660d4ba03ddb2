//! OCCI core tests: query interface.

use std::collections::HashSet;

use futures_util::future::LocalBoxFuture;
use rand::seq::SliceRandom;

use crate::client::{ClientError, OcciRequest};
use crate::modules::{CORE_SCHEME, INFRASTRUCTURE_SCHEME, IPNETWORK_SCHEME, QUERY_INTERFACE};
use crate::occi::{Category, Structure};
use crate::registry::{ModuleGroup, Param, TestModule};
use crate::tester::{Args, Assertions, Context, TestResult, Value};

const NAME: &str = "core_query";

pub const GROUP: ModuleGroup = ModuleGroup {
    name: NAME,
    doc: Some("OCCI core tests: Query interface."),
    modules: &[
        TestModule::new(NAME, "availability", availability)
            .doc("Test the availability of the OCCI query interface."),
        TestModule::new(NAME, "builtinStructures", builtin_structures)
            .doc("Test the availability of the built-in OCCI types.")
            .params(&[Param::bool(
                "testInfrastructureTypes",
                Some("Test for infrastructure types"),
                true,
            )]),
        TestModule::new(NAME, "fixedFilter", fixed_filter)
            .doc("Test the query interface filter using a fixed filter."),
        TestModule::new(NAME, "randomFilter", random_filter).doc(
            "Test the query interface filter by first requesting a full discovery and randomly selecting a subset.",
        ),
    ],
};

/// Number of structures picked by the random filter.
const RANDOM_FILTER_SIZE: usize = 4;

fn core_structures() -> Vec<Structure> {
    ["entity", "link", "resource"]
        .into_iter()
        .map(|term| Category::kind(term, CORE_SCHEME).into())
        .collect()
}

fn infrastructure_structures() -> Vec<Structure> {
    let mut structures: Vec<Structure> = [
        "compute",
        "network",
        "networkinterface",
        "storage",
        "storagelink",
    ]
    .into_iter()
    .map(|term| Category::kind(term, INFRASTRUCTURE_SCHEME).into())
    .collect();

    structures.push(Category::mixin("ipnetwork", IPNETWORK_SCHEME).into());

    let actions: [(&str, &[&str]); 5] = [
        ("compute", &["restart", "start", "stop", "suspend"]),
        ("network", &["down", "up"]),
        ("networkinterface", &["down", "up"]),
        ("storagelink", &["down", "up"]),
        ("storage", &["backup", "offline", "online", "resize", "snapshot"]),
    ];
    for (kind, terms) in actions {
        let scheme = format!("http://schemas.ogf.org/occi/infrastructure/{}/action#", kind);
        structures.extend(terms.iter().map(|term| Category::action(*term, scheme.as_str()).into()));
    }

    structures
}

/// `class/term` for categories, the rendering otherwise.
fn filter_label(structure: &Structure) -> String {
    match structure {
        Structure::Category(c) => format!("{}/{}", c.class, c.term),
        other => other.render(),
    }
}

fn availability(t: &mut Context, _args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let rsp = match t.request(OcciRequest::get(QUERY_INTERFACE)).await {
            Ok(rsp) => rsp,
            Err(ClientError::Status(e)) => {
                return t.fail(format!(
                    "OCCI query interface failed with status code {}",
                    e.status
                ))
            }
            Err(e) => return Err(e.into()),
        };
        t.assert_true(!rsp.structures().is_empty(), None)?;
        Ok(Value::Null)
    })
}

fn builtin_structures(t: &mut Context, args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let infrastructure = args.bool("testInfrastructureTypes")?;

        let rsp = t.request(OcciRequest::get(QUERY_INTERFACE)).await?;
        let found: Vec<Structure> = rsp.structures().into_iter().cloned().collect();
        t.log(format_args!("{} structures found.", found.len()));
        t.assert_true(!found.is_empty(), None)?;

        for structure in core_structures() {
            t.assert_in(&structure, &found, None)?;
        }
        if infrastructure {
            for structure in infrastructure_structures() {
                t.assert_in(&structure, &found, None)?;
            }
        }
        Ok(Value::Null)
    })
}

fn fixed_filter(t: &mut Context, _args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let data: HashSet<Structure> = [
            Category::kind("networkinterface", INFRASTRUCTURE_SCHEME).into(),
            Category::action(
                "backup",
                "http://schemas.ogf.org/occi/infrastructure/storage/action#",
            )
            .into(),
        ]
        .into_iter()
        .collect();

        let rsp = t
            .request(OcciRequest::get(QUERY_INTERFACE).headers(data.iter().cloned()))
            .await?;
        let structures = rsp.structures();
        t.assert_equal(structures.len(), data.len(), None)?;

        let received: HashSet<Structure> = structures.into_iter().cloned().collect();
        t.assert_equal(received.len(), data.len(), None)?;
        t.assert_equal(&received, &data, None)?;
        Ok(Value::Null)
    })
}

fn random_filter(t: &mut Context, _args: Args) -> LocalBoxFuture<'_, TestResult> {
    Box::pin(async move {
        let full = t.request(OcciRequest::get(QUERY_INTERFACE)).await?;
        let available = full.structures();
        t.assert_true(
            available.len() >= RANDOM_FILTER_SIZE,
            Some("Not enough structures for a random filter"),
        )?;

        let data: HashSet<Structure> = available
            .choose_multiple(&mut rand::thread_rng(), RANDOM_FILTER_SIZE)
            .map(|s| (*s).clone())
            .collect();
        let labels: Vec<String> = data.iter().map(filter_label).collect();
        t.log(format_args!("Active filter: {}", labels.join(", ")));

        let rsp = t
            .request(OcciRequest::get(QUERY_INTERFACE).headers(data.iter().cloned()))
            .await?;
        let structures = rsp.structures();
        t.assert_equal(structures.len(), data.len(), None)?;

        let received: HashSet<Structure> = structures.into_iter().cloned().collect();
        t.assert_equal(&received, &data, None)?;
        Ok(Value::Null)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables() {
        let core = core_structures();
        assert_eq!(core.len(), 3);
        assert!(core.iter().all(|s| s.as_category().is_some_and(Category::is_kind)));

        let infrastructure = infrastructure_structures();
        assert_eq!(infrastructure.len(), 6 + 15);
        assert!(infrastructure.contains(&Category::action("snapshot", "http://schemas.ogf.org/occi/infrastructure/storage/action#").into()));
        assert!(infrastructure.contains(&Category::mixin("ipnetwork", IPNETWORK_SCHEME).into()));
    }

    #[test]
    fn test_filter_label() {
        let kind: Structure = Category::kind("compute", INFRASTRUCTURE_SCHEME).into();
        assert_eq!(filter_label(&kind), "kind/compute");
    }
}
