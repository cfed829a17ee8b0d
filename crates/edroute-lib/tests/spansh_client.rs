mod common;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use edroute_lib::error::{Error, Result, PLOT_ERROR_MESSAGE, TIMEOUT_MESSAGE};
use edroute_lib::{
    PlotRequest, RouteClient, RouteKind, RouteStore, RouteTransport, Session, TransportResponse,
    Waypoint,
};
use tempfile::tempdir;

const JOB: &str = r#"{"job":"F2B5B476-4458-11EB-8EE9-34F1BA3A1F2E","status":"queued"}"#;

const RESULT: &str = r#"{
    "job": "F2B5B476-4458-11EB-8EE9-34F1BA3A1F2E",
    "status": "ok",
    "result": {
        "efficiency": 60,
        "range": 50.0,
        "source_system": "Sol",
        "destination_system": "Colonia",
        "system_jumps": [
            {"system": "Sol", "jumps": 0, "distance_jumped": 0, "neutron_star": false},
            {"system": "Praea Euq NW-W b1-3", "jumps": 4, "distance_jumped": 416.87, "neutron_star": true},
            {"system": "Colonia", "jumps": 7, "distance_jumped": 21583.64, "neutron_star": false}
        ]
    }
}"#;

/// Transport answering from a script, recording how often it was polled.
#[derive(Default)]
struct ScriptedTransport {
    submit: RefCell<Option<TransportResponse>>,
    polls: RefCell<VecDeque<TransportResponse>>,
    poll_count: Cell<u32>,
    last_job: RefCell<Option<String>>,
}

impl ScriptedTransport {
    fn new(submit: TransportResponse, polls: Vec<TransportResponse>) -> Self {
        Self {
            submit: RefCell::new(Some(submit)),
            polls: RefCell::new(polls.into()),
            ..Self::default()
        }
    }

    fn accepted_then(polls: Vec<TransportResponse>) -> Self {
        Self::new(TransportResponse::new(202, JOB), polls)
    }
}

impl RouteTransport for ScriptedTransport {
    fn submit(&self, _request: &PlotRequest) -> Result<TransportResponse> {
        Ok(self
            .submit
            .borrow_mut()
            .take()
            .expect("submit called once"))
    }

    fn poll(&self, job: &str) -> Result<TransportResponse> {
        self.poll_count.set(self.poll_count.get() + 1);
        *self.last_job.borrow_mut() = Some(job.to_string());
        Ok(self
            .polls
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| TransportResponse::new(202, JOB)))
    }
}

fn client(transport: ScriptedTransport) -> RouteClient<ScriptedTransport> {
    RouteClient::new(transport).with_poll_interval(Duration::ZERO)
}

fn request() -> PlotRequest {
    PlotRequest::new("Sol", "Colonia", "50", 60).expect("valid request")
}

#[test]
fn finished_job_becomes_plain_route() {
    let client = client(ScriptedTransport::accepted_then(vec![
        TransportResponse::new(202, JOB),
        TransportResponse::new(200, RESULT),
    ]));

    let route = client.plot(&request()).expect("route plotted");

    assert_eq!(route.kind(), RouteKind::Plain);
    assert_eq!(
        route.waypoints(),
        &[
            Waypoint::plain("Sol", Some(0)),
            Waypoint::plain("Praea Euq NW-W b1-3", Some(4)),
            Waypoint::plain("Colonia", Some(7)),
        ]
    );
    assert_eq!(client.transport().poll_count.get(), 2);
    assert_eq!(
        client.transport().last_job.borrow().as_deref(),
        Some("F2B5B476-4458-11EB-8EE9-34F1BA3A1F2E")
    );
}

#[test]
fn twenty_pending_polls_time_out() {
    let client = client(ScriptedTransport::accepted_then(Vec::new()));

    let err = client.plot(&request()).expect_err("never finishes");

    assert!(matches!(err, Error::RemoteTimeout { attempts: 20 }));
    assert_eq!(err.user_message(), TIMEOUT_MESSAGE);
    assert_eq!(client.transport().poll_count.get(), 20);
}

#[test]
fn poll_budget_is_configurable() {
    let client = client(ScriptedTransport::accepted_then(Vec::new())).with_max_polls(3);

    let err = client.plot(&request()).expect_err("never finishes");

    assert!(matches!(err, Error::RemoteTimeout { attempts: 3 }));
    assert_eq!(client.transport().poll_count.get(), 3);
}

#[test]
fn unknown_source_is_flagged() {
    let client = client(ScriptedTransport::new(
        TransportResponse::new(400, r#"{"error":"unknown starting system X"}"#),
        Vec::new(),
    ));

    let err = client.plot(&request()).expect_err("rejected");

    match &err {
        Error::RouteRejected {
            message,
            source_system,
            destination_system,
        } => {
            assert_eq!(message, "unknown starting system X");
            assert!(*source_system);
            assert!(!*destination_system);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "unknown starting system X");
    assert_eq!(client.transport().poll_count.get(), 0);
}

#[test]
fn rejection_while_polling_uses_poll_body() {
    let client = client(ScriptedTransport::accepted_then(vec![TransportResponse::new(
        400,
        r#"{"error":"Could not find finishing system Nowhere"}"#,
    )]));

    let err = client.plot(&request()).expect_err("rejected");

    assert!(matches!(
        err,
        Error::RouteRejected {
            source_system: false,
            destination_system: true,
            ..
        }
    ));
}

#[test]
fn server_error_gets_generic_message() {
    let client = client(ScriptedTransport::accepted_then(vec![TransportResponse::new(
        500,
        "Internal Server Error",
    )]));

    let err = client.plot(&request()).expect_err("server failed");

    assert!(matches!(
        err,
        Error::RemoteRequest {
            status: Some(500),
            ..
        }
    ));
    assert_eq!(err.user_message(), PLOT_ERROR_MESSAGE);
    assert_eq!(client.transport().poll_count.get(), 1);
}

#[test]
fn unreadable_result_is_a_decoding_error() {
    let client = client(ScriptedTransport::accepted_then(vec![TransportResponse::new(
        200,
        r#"{"status":"ok"}"#,
    )]));

    let err = client.plot(&request()).expect_err("no result field");

    assert!(matches!(err, Error::Json(_)));
    assert_eq!(err.user_message(), PLOT_ERROR_MESSAGE);
}

#[test]
fn result_with_blank_system_is_a_plot_failure() {
    let client = client(ScriptedTransport::accepted_then(vec![TransportResponse::new(
        200,
        r#"{"result":{"system_jumps":[{"system":"","jumps":0}]}}"#,
    )]));

    let err = client.plot(&request()).expect_err("blank system");

    assert!(matches!(
        err,
        Error::RemoteRequest {
            status: Some(200),
            ..
        }
    ));
    assert_eq!(err.user_message(), PLOT_ERROR_MESSAGE);
}

#[test]
fn failed_plot_leaves_session_untouched() {
    let dir = tempdir().unwrap();
    let mut session = Session::new(RouteStore::new(dir.path()));
    session.install_remote(common::neutron_route(), None).unwrap();
    session.advance().unwrap();
    let before = session.view();

    let failing = client(ScriptedTransport::accepted_then(Vec::new()));
    assert!(session.plot(&failing, &request(), Some("Sol")).is_err());
    assert_eq!(session.view(), before);

    let working = client(ScriptedTransport::accepted_then(vec![TransportResponse::new(
        200, RESULT,
    )]));
    let view = session
        .plot(&working, &request(), Some("Sol"))
        .expect("plot succeeds");
    assert_eq!(view.offset, 1);
    assert_eq!(view.next_stop, "Praea Euq NW-W b1-3");
    assert_eq!(view.jumps_left, 11);
}
