//! Edge case and boundary condition tests for decoding and routing

use rs_wifibot::hal::{MockMotorChannel, MockStatusLed};
use rs_wifibot::services::{greeter_routes, not_found, HttpResponder, Router};
use rs_wifibot::traits::{HttpMethod, HttpRequest, HttpResponse};
use rs_wifibot::{Command, Direction, MotorController, DUTY_STOP};

// ============================================================================
// Command Decoding
// ============================================================================

#[test]
fn trailing_bytes_are_ignored() {
    assert_eq!(Command::decode(b"#Fxyz"), Command::Forward);
    assert_eq!(Command::decode(b"#R\n"), Command::Right);
    assert_eq!(Command::decode(b"#B\0"), Command::Backward);
}

#[test]
fn codes_are_case_sensitive() {
    for frame in [b"#f", b"#b", b"#l", b"#r"] {
        assert_eq!(Command::decode(frame), Command::Stop);
    }
}

#[test]
fn sentinel_must_come_first() {
    assert_eq!(Command::decode(b" #F"), Command::Stop);
    assert_eq!(Command::decode(b"F#"), Command::Stop);
    assert_eq!(Command::decode(b"##F"), Command::Stop);
}

#[test]
fn non_ascii_frames_stop() {
    assert_eq!(Command::decode("#é".as_bytes()), Command::Stop);
    assert_eq!(Command::decode(&[0xff, b'F']), Command::Stop);
}

#[test]
fn repeated_stops_never_touch_directions() {
    let mut c = MotorController::new(MockMotorChannel::new(), MockMotorChannel::new()).unwrap();
    c.right().unwrap();

    for _ in 0..5 {
        c.apply(Command::decode(b"#?")).unwrap();
    }

    assert_eq!(c.left_channel().direction, Direction::Forward);
    assert_eq!(c.right_channel().direction, Direction::Backward);
    assert_eq!(c.left_channel().duty, DUTY_STOP);
    assert_eq!(c.right_channel().duty, DUTY_STOP);
    // boot + right wrote each direction pin twice, stops added nothing
    assert_eq!(c.left_channel().direction_writes, 2);
}

// ============================================================================
// HTTP Requests
// ============================================================================

#[test]
fn query_arguments_are_decoded_in_order() {
    let req = HttpRequest::from_uri(HttpMethod::Get, "/x?b=2&a=hello%20world&flag");
    assert_eq!(req.path, "/x");
    assert_eq!(req.args.len(), 3);
    assert_eq!(req.arg("a"), Some("hello world"));
    assert_eq!(req.args[0], ("b".to_string(), "2".to_string()));
    assert_eq!(req.arg("flag"), Some(""));
}

#[test]
fn empty_uri_is_root() {
    let req = HttpRequest::from_uri(HttpMethod::Get, "");
    assert_eq!(req.path, "/");
    assert!(req.args.is_empty());
}

#[test]
fn not_found_lists_decoded_arguments() {
    let req = HttpRequest::from_uri(HttpMethod::Post, "/drive?speed=fast&dir=up%2Fdown");
    let body = not_found(&req).body_str().unwrap().to_string();
    assert!(body.contains("URI: /drive\n"));
    assert!(body.contains("Method: POST\n"));
    assert!(body.contains("Arguments: 2\n"));
    assert!(body.ends_with(" speed: fast\n dir: up/down\n"));
}

#[test]
fn routes_match_exact_paths_only() {
    let router = greeter_routes("bot");
    for path in ["/inline/", "/INLINE", "/inline/x", "//"] {
        let resp = router.dispatch(&HttpRequest::new(HttpMethod::Get, path));
        assert_eq!(resp.status, 404, "{path}");
    }
}

#[test]
fn query_does_not_affect_matching() {
    let router = greeter_routes("bot");
    let resp = router.dispatch(&HttpRequest::from_uri(HttpMethod::Get, "/inline?x=1"));
    assert_eq!(resp.body_str(), Some("this works as well"));
}

#[test]
fn empty_router_answers_everything_with_404() {
    let mut responder = HttpResponder::new(Router::new(), MockStatusLed::new());
    for method in [HttpMethod::Get, HttpMethod::Post, HttpMethod::Options] {
        let resp = responder.handle(&HttpRequest::new(method, "/"));
        assert_eq!(resp.status, 404);
    }
    assert_eq!(responder.indicator().pulses, 3);
}

#[test]
fn handlers_can_read_the_request() {
    let router = Router::new().route(HttpMethod::Post, "/echo", |req| {
        HttpResponse::ok_text(req.body_str().unwrap_or("<none>"))
    });

    let req = HttpRequest::new(HttpMethod::Post, "/echo").with_body(b"#F".to_vec());
    assert_eq!(router.dispatch(&req).body_str(), Some("#F"));

    let req = HttpRequest::new(HttpMethod::Post, "/echo");
    assert_eq!(router.dispatch(&req).body_str(), Some("<none>"));
}
