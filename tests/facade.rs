use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use lightdom::prelude::*;
use lightdom::{ManualFrameScheduler, ManualTimer};

#[test]
fn config_from_json_reaches_callbacks() {
    let config: AnimatorConfig =
        serde_json::from_str(r#"{"frame_rate": 24, "report_interval_ms": 250}"#).unwrap();
    let frames = Rc::new(ManualFrameScheduler::new());
    let animator: Animator<&str> = Animator::with_config(config, frames.clone());

    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    animator.animate("title", ["intro"], move |group: &[&str], _: f64, data: &FrameData| {
        log.borrow_mut().push((group[0], data.frame_rate));
    });

    frames.advance(0.0);
    frames.advance(41.0);

    assert_eq!(*seen.borrow(), [("intro", 24), ("intro", 24)]);
    assert_eq!(animator.config().report_interval_ms, 250.0);
}

#[test]
fn debounced_template_render() {
    let rendered = Rc::new(RefCell::new(Vec::new()));
    let width = Rc::new(RefCell::new(0_u32));

    let timer = ManualTimer::new();
    let out = rendered.clone();
    let current = width.clone();
    let resize = Debounced::with_default_delay(timer.clone(), move || {
        let vars = [("width", *current.borrow())];
        out.borrow_mut().push(expand("<svg width=\"{{width}}\">", &vars));
    });

    for w in [320, 480, 640] {
        *width.borrow_mut() = w;
        resize.trigger().unwrap();
        timer.advance(Duration::from_millis(100));
    }
    assert!(rendered.borrow().is_empty());

    timer.advance(Duration::from_millis(300));
    assert_eq!(*rendered.borrow(), ["<svg width=\"640\">"]);
}

#[test]
fn web_module_exposes_the_browser_host() {
    let view_box = lightdom::web::ViewBox::from_dims(&[800.0, 600.0]).unwrap();
    assert_eq!(view_box.to_string(), "0 0 800 600");
    assert_eq!(lightdom::web::SVG_NAMESPACE, "http://www.w3.org/2000/svg");
}
