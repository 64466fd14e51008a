//! End-to-end behaviour of the frame loop with shared subjects.
//!
//! Models a page that scatters shapes, animates them every frame and rebuilds
//! everything on a debounced resize.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use lightdom_core::{
    AnimationError, AnimatorBuilder, AnimatorConfig, Animator, Debounced, FrameData,
    ManualFrameScheduler, ManualTimer,
};

#[derive(Debug, Default)]
struct Shape {
    x: f64,
    velocity: f64,
}

type Subject = Rc<RefCell<Shape>>;

#[allow(clippy::cast_precision_loss)]
fn shapes(count: usize) -> Vec<Subject> {
    (0..count)
        .map(|i| {
            Rc::new(RefCell::new(Shape {
                x: 0.0,
                velocity: (i + 1) as f64,
            }))
        })
        .collect()
}

fn drift(group: &[Subject], _timestamp: f64, data: &FrameData) {
    let step = 60.0 / f64::from(data.frame_rate);
    for shape in group {
        let mut shape = shape.borrow_mut();
        shape.x += shape.velocity * step;
    }
}

#[test]
fn callbacks_mutate_caller_owned_subjects() {
    let scheduler = Rc::new(ManualFrameScheduler::new());
    let animator: Animator<Subject> = Animator::new(Rc::clone(&scheduler));
    let things = shapes(3);

    animator.animate("things", things.clone(), drift);
    for frame in 0..4_u32 {
        scheduler.advance(f64::from(frame) * 16.0);
    }

    let positions: Vec<f64> = things.iter().map(|shape| shape.borrow().x).collect();
    assert_eq!(positions, vec![4.0, 8.0, 12.0]);
}

#[test]
fn debounced_resize_rebuilds_the_animation_once() {
    let scheduler = Rc::new(ManualFrameScheduler::new());
    let timer = ManualTimer::new();
    let animator: Animator<Subject> =
        Animator::with_config(AnimatorConfig::default().with_frame_rate(30), Rc::clone(&scheduler));
    let current = Rc::new(RefCell::new(Vec::new()));
    let rebuilds = Rc::new(Cell::new(0));

    let init = {
        let animator = animator.clone();
        let current = Rc::clone(&current);
        let rebuilds = Rc::clone(&rebuilds);
        move || {
            let things = shapes(2);
            animator.stop("things");
            animator.animate("things", things.clone(), drift);
            *current.borrow_mut() = things;
            rebuilds.set(rebuilds.get() + 1);
        }
    };
    init();
    let on_resize = Debounced::with_default_delay(timer.clone(), init);

    for _ in 0..10 {
        on_resize.trigger().unwrap();
        timer.advance(Duration::from_millis(20));
        scheduler.advance(timer.now().as_secs_f64() * 1000.0);
    }
    assert_eq!(rebuilds.get(), 1);

    timer.advance(Duration::from_millis(300));
    assert_eq!(rebuilds.get(), 2);
    assert_eq!(animator.len(), 1);

    scheduler.advance(1000.0);
    let positions: Vec<f64> = current.borrow().iter().map(|shape| shape.borrow().x).collect();
    assert_eq!(positions, vec![2.0, 4.0]);
}

#[test]
fn one_broken_animation_leaves_the_rest_running() {
    let scheduler = Rc::new(ManualFrameScheduler::new());
    let reported: Rc<RefCell<Vec<String>>> = Rc::default();
    let animator: Animator<Subject> = {
        let reported = Rc::clone(&reported);
        AnimatorBuilder::new()
            .on_error(move |error: &AnimationError| reported.borrow_mut().push(error.name().to_owned()))
            .build(Rc::clone(&scheduler))
    };
    let healthy = shapes(1);

    animator.animate("broken", shapes(1), |_: &[Subject], _, _: &FrameData| {
        Err::<(), String>("element detached".to_owned())
    });
    animator.animate("healthy", healthy.clone(), drift);

    for frame in 0..3_u32 {
        scheduler.advance(f64::from(frame) * 16.0);
    }

    assert!((healthy[0].borrow().x - 3.0).abs() < f64::EPSILON);
    assert_eq!(reported.borrow().len(), 3);
    assert_eq!(scheduler.pending_frames(), 1);
}
