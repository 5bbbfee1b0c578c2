// Ooga Workbench - Debug visualization for ooga-lang programs
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use ooga_common::types::{Address, RunResponse, StackRegion};
use ooga_engine::{Highlight, StackNodeId, SyncOutcome, Workbench};
use serde_json::json;
use tracing::info;

fn response() -> RunResponse {
    serde_json::from_value(json!({
        "success": true,
        "output": "3\n",
        "heaps": [
            [
                {"address": 10, "tag": "Frame", "size": 3, "value": null, "children": [20, 30], "parents": []},
                {"address": 20, "tag": "Closure", "size": 2, "value": null, "children": [40], "parents": [10, 40]},
                {"address": 30, "tag": "Number", "size": 1, "value": 3, "children": [], "parents": [10]},
                {"address": 40, "tag": "Env", "size": 2, "value": null, "children": [20], "parents": [20]}
            ],
            [
                {"address": 30, "tag": "Number", "size": 1, "value": 3, "children": [], "parents": []}
            ]
        ],
        "stacks": [
            {
                "threads": [
                    {"os": [{"address": 30, "value": 3, "raw": "0x03"}], "rts": [{"address": 10, "value": null, "raw": "0x0a"}]},
                    {"os": [{"address": 7, "value": true, "raw": "0x01"}], "rts": []}
                ],
                "currentThread": 1
            },
            {"threads": [{"os": [], "rts": []}], "currentThread": 0}
        ]
    }))
    .expect("valid response")
}

fn entry(thread: usize, region: StackRegion, index: usize) -> StackNodeId {
    StackNodeId::Entry { thread, region, index }
}

#[test]
fn test_run_response_drives_both_views() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");

    let mut workbench = Workbench::new();
    assert_eq!(workbench.load(&response()), 2);

    assert_eq!(workbench.heap().len(), 4);
    assert_eq!(workbench.heap().edges().len(), 4);
    assert!(workbench.diagnostics().is_empty());

    let stack = workbench.stack();
    assert_eq!(stack.thread_count(), 2);
    assert_eq!(stack.current_thread(), Some(1));
    assert_eq!(stack.node(StackNodeId::Thread(1)).map(|n| n.label()), Some("Thread 1 (Current)"));
}

#[test]
fn test_stack_click_equals_heap_click() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");

    let mut direct = Workbench::new();
    direct.load(&response());
    direct.click_heap(Address(10));

    let mut relayed = Workbench::new();
    relayed.load(&response());
    let click = relayed.click_stack(entry(0, StackRegion::RuntimeStack, 0));
    assert!(matches!(click.sync, SyncOutcome::Forwarded(_)));

    let highlights =
        |w: &Workbench| w.heap().nodes().iter().map(|n| n.highlight()).collect::<Vec<_>>();
    assert_eq!(highlights(&relayed), highlights(&direct));
    assert_eq!(
        highlights(&relayed),
        vec![Highlight::Current, Highlight::Descendant, Highlight::Descendant, Highlight::Descendant]
    );
}

#[test]
fn test_scalar_stack_value_is_noop() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");

    let mut workbench = Workbench::new();
    workbench.load(&response());
    workbench.click_heap(Address(30));

    let click = workbench.click_stack(entry(1, StackRegion::OperandStash, 0));
    assert_eq!(click.sync, SyncOutcome::NoMatch(Address(7)));
    assert_eq!(workbench.heap().focus(), Some(Address(30)));
    assert_eq!(workbench.heap().with_highlight(Highlight::Ancestor), vec![Address(10)]);
}

#[test]
fn test_cycle_in_run_terminates() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");

    let mut workbench = Workbench::new();
    workbench.load(&response());
    let outcome = workbench.click_heap(Address(40)).expect("address is present");

    // 40 -> 20 -> 40 is a cycle; 10 reaches it from above
    assert_eq!(outcome.descendants_visited, 2);
    assert_eq!(outcome.ancestors_visited, 3);
    assert_eq!(workbench.heap().with_highlight(Highlight::Ancestor), vec![Address(10), Address(20)]);
    assert!(workbench.heap().with_highlight(Highlight::Descendant).is_empty());
}

#[test]
fn test_breakpoint_navigation_resets_selection() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");

    let mut workbench = Workbench::new();
    workbench.load(&response());
    workbench.click_stack(entry(0, StackRegion::OperandStash, 0));
    assert!(workbench.selected_element().is_some());

    assert_eq!(workbench.select_breakpoint(5), 1);
    assert_eq!(workbench.heap().len(), 1);
    assert!(workbench.selected_element().is_none());
    assert!(workbench.stack().selected().is_empty());
    assert_eq!(workbench.heap().highlight(Address(30)), Some(Highlight::Neutral));
}

#[test]
fn test_failed_run_is_empty_state() {
    ooga_common::logging::ensure_test_logging(None);
    info!("Running test");

    let response: RunResponse =
        serde_json::from_value(json!({"success": false, "error": "Type error"})).expect("valid response");
    let mut workbench = Workbench::new();
    assert_eq!(workbench.load(&response), 0);
    assert!(workbench.heap().is_empty());
    assert!(workbench.stack().is_empty());
    assert_eq!(workbench.select_breakpoint(3), 0);
}
