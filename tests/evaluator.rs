use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use wdte::{
    error::{Failure, RuntimeError},
    eval_fragment,
    interpreter::{
        import::Registry,
        value::{
            frame::{CallPath, Frame, Signal},
            func::{Arity, Func, Order},
            scope::Scope,
        },
    },
    load, prelude,
};

fn frame() -> Frame {
    Frame::new(prelude())
}

fn eval(source: &str, frame: &Frame) -> Func {
    eval_fragment(source, frame).unwrap_or_else(|e| panic!("failed to load {source:?}: {e}"))
}

fn cause(value: &Func) -> &RuntimeError {
    &value.failure()
          .unwrap_or_else(|| panic!("expected an error value, got {value}"))
          .cause
}

/// Builds a native that appends `name` to `log` and returns its argument.
fn recorder(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Func {
    let log = log.clone();
    Func::native(name, 1, move |frame, args| {
        log.lock().unwrap().push(name.to_string());
        frame.arg::<Func>(args, 0).into()
    })
}

#[test]
fn values_are_idempotent_under_calling() {
    let frame = frame();
    let values = [Func::from(4.0), Func::from("s"), Func::from(true), Func::from(vec![Func::from(1.0)])];
    for value in values {
        let called = value.call(&frame, &[Func::from(1.0), Func::from("extra")]);
        assert!(called.equals(&value), "{value} changed to {called}");
    }
}

#[test]
fn currying_is_associative() {
    let frame = frame();
    let script = load("three a b c => + (* a 100) (* b 10) c;", &Registry::new()).unwrap();
    let three = script.call(&frame, "three", &[]);

    let args = [Func::from(1.0), Func::from(2.0), Func::from(3.0)];
    let whole = three.call(&frame, &args);
    for k in 1..args.len() {
        let split = three.call(&frame, &args[..k]).call(&frame, &args[k..]);
        assert!(split.equals(&whole), "split at {k}: {split} != {whole}");
    }
    assert!(whole.equals(&Func::from(123.0)));

    let minus = frame.scope().get("-").unwrap();
    let partial = minus.call(&frame, &[Func::from(10.0)]);
    let Func::Partial(p) = &partial else {
        panic!("expected a partial application");
    };
    assert_eq!(p.remaining(), 1);
    assert!(partial.call(&frame, &[]).equals(&partial));
    assert!(partial.call(&frame, &[Func::from(4.0)]).equals(&Func::from(6.0)));
}

#[test]
fn chain_laws() {
    let frame = frame();
    let log = Arc::new(Mutex::new(Vec::new()));
    let scope = frame.scope()
                     .add("f", recorder("f", &log))
                     .add("g", recorder("g", &log));
    let frame = frame.with_scope(scope);

    assert!(eval("1 -> + 1 -> * 10", &frame).equals(&Func::from(20.0)));

    let result = eval("3 -- f -> g", &frame);
    assert!(result.equals(&Func::from(3.0)));
    assert_eq!(*log.lock().unwrap(), vec!["f", "g"]);
}

#[test]
fn ignored_segment_errors_propagate() {
    let frame = frame();
    let result = eval("3 -- error 'side effect failed' -> + 1", &frame);
    assert_eq!(cause(&result), &RuntimeError::Custom("side effect failed".into()));
}

#[test]
fn error_recovery_chain() {
    let frame = frame();
    let log = Arc::new(Mutex::new(Vec::new()));
    let frame = frame.with_scope(frame.scope().add("g", recorder("g", &log)));

    let recovered = eval("[1] -> at 5 -| (@ h e => 'recovered') -> g", &frame);
    assert!(recovered.equals(&Func::from("recovered")));
    assert_eq!(*log.lock().unwrap(), vec!["g"]);

    log.lock().unwrap().clear();
    let failed = eval("[1] -> at 5 -> g", &frame);
    assert_eq!(cause(&failed), &RuntimeError::IndexOutOfRange { index: 5, len: 1 });
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn switch_default_returns_the_subject() {
    let frame = frame();
    assert!(eval("+ 2 2 { == 5 => 'five'; }", &frame).equals(&Func::from(4.0)));
    assert!(eval("'x' { }", &frame).equals(&Func::from("x")));
    assert!(eval("4 { == 4 => 'four'; default => 'other'; }", &frame).equals(&Func::from("four")));
}

#[test]
fn switch_results_take_the_subject() {
    let frame = frame();
    assert!(eval("3 { default => + 1; }", &frame).equals(&Func::from(4.0)));
    assert!(eval("3 { 3 => 'three'; }", &frame).equals(&Func::from("three")));
    assert!(eval("[2; 7] { default => at 1; }", &frame).equals(&Func::from(7.0)));

    let failed = eval("3 { default => / 1 0; }", &frame);
    assert_eq!(cause(&failed), &RuntimeError::DivisionByZero);
}

#[test]
fn concrete_fragments() {
    let frame = frame();
    assert!(eval("5 -> + 2 -- * 3;", &frame).equals(&Func::from(7.0)));
    assert!(eval("[1; 2; 3] -> at 1;", &frame).equals(&Func::from(2.0)));

    let out_of_range = eval("[1; 2; 3] -> at 7;", &frame);
    assert_eq!(cause(&out_of_range), &RuntimeError::IndexOutOfRange { index: 7, len: 3 });

    assert!(eval("", &frame).equals(&Func::from(Vec::<Func>::new())));
}

#[test]
fn memoized_body_runs_once_per_argument() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();
    let tick = Func::native("tick", 1, move |frame, args| {
        counter.fetch_add(1, Ordering::SeqCst);
        frame.arg::<Func>(args, 0).into()
    });

    let script = load("memo fib n => tick n { 0 => 0; 1 => 1; default => + (fib (- n 1)) (fib (- n 2)); };
                       main => fib 10;",
                      &Registry::new()).unwrap();
    let frame = Frame::new(prelude().add("tick", tick));

    let result = script.call(&frame, "main", &[]);
    assert!(result.equals(&Func::from(55.0)), "got {result}");
    assert_eq!(ticks.load(Ordering::SeqCst), 11);

    let again = script.call(&frame, "main", &[]);
    assert!(again.equals(&result));
    assert_eq!(ticks.load(Ordering::SeqCst), 11);
}

#[test]
fn memo_does_not_cache_errors() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let flaky = Func::native("flaky", 1, move |frame, args| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            return frame.error(RuntimeError::Custom("first try".into()));
        }
        frame.arg::<Func>(args, 0).into()
    });

    let script = load("memo f n => flaky n;", &Registry::new()).unwrap();
    let frame = Frame::new(prelude().add("flaky", flaky));

    assert!(script.call(&frame, "f", &[Func::from(1.0)]).is_error());
    assert!(script.call(&frame, "f", &[Func::from(1.0)]).equals(&Func::from(1.0)));
    assert!(script.call(&frame, "f", &[Func::from(1.0)]).equals(&Func::from(1.0)));
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn side_effects_happen_in_source_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let scope = prelude().add("a", recorder("a", &log))
                         .add("b", recorder("b", &log))
                         .add("c", recorder("c", &log))
                         .add("d", recorder("d", &log));
    let frame = Frame::new(scope);

    eval("[a 1; b 2]; (c 3; d 4)", &frame);
    eval("1 -> a -- b -> c", &frame);
    eval("&& (a true) (b true) (c false) (d true)", &frame);

    let expected = ["a", "b", "c", "d", "a", "b", "c", "a", "b", "c"];
    assert_eq!(*log.lock().unwrap(), expected);
}

#[test]
fn compound_stops_at_the_first_error() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let frame = Frame::new(prelude().add("a", recorder("a", &log)));

    let result = eval("(a 1; / 1 0; a 2)", &frame);
    assert_eq!(cause(&result), &RuntimeError::DivisionByZero);
    assert_eq!(*log.lock().unwrap(), vec!["a"]);
}

#[test]
fn cancellation_stops_an_infinite_loop() {
    let script = load("loop n => loop (+ n 1);", &Registry::new()).unwrap();
    let signal = Signal::new();
    let frame = frame().with_signal(signal.clone()).with_max_depth(usize::MAX);

    signal.cancel();
    let result = script.call(&frame, "loop", &[Func::from(0.0)]);
    assert_eq!(cause(&result), &RuntimeError::Cancelled);
}

#[test]
fn deadline_is_reported() {
    let script = load("spin n => n { default => spin n; };", &Registry::new()).unwrap();
    let signal = Signal::new().with_deadline(Instant::now() - Duration::from_millis(1));
    let frame = frame().with_signal(signal);

    let result = script.call(&frame, "spin", &[Func::from(1.0)]);
    assert_eq!(cause(&result), &RuntimeError::DeadlineExceeded);
}

#[test]
fn recursion_limit_yields_an_error_value() {
    let worker = thread::Builder::new().stack_size(64 * 1024 * 1024)
                                       .spawn(|| {
                                           let script = load("down n => down (+ n 1);", &Registry::new()).unwrap();
                                           let frame = frame().with_max_depth(32);
                                           let result = script.call(&frame, "down", &[Func::from(0.0)]);
                                           cause(&result).clone()
                                       })
                                       .unwrap();

    assert_eq!(worker.join().unwrap(), RuntimeError::RecursionLimit { limit: 32 });
}

#[test]
fn natives_do_not_count_towards_the_depth_limit() {
    let frame = frame().with_max_depth(0);
    assert!(eval("+ 1 (* 2 (- 5 1))", &frame).equals(&Func::from(9.0)));

    let nested = eval("(@ f x => x) 1", &frame);
    assert_eq!(cause(&nested), &RuntimeError::RecursionLimit { limit: 0 });
}

#[test]
fn memo_keeps_function_arguments_apart() {
    let script = load("memo call g => g 0;", &Registry::new()).unwrap();
    let frame = frame();

    for name in ["first", "second", "third"] {
        let constant = Func::native(name, 1, move |_, _| Func::from(name));
        let result = script.call(&frame, "call", &[constant]);
        assert!(result.equals(&Func::from(name)), "expected {name}, got {result}");
    }
}

#[test]
fn failures_show_the_innermost_calls() {
    let path = (0..20).fold(CallPath::default(), |path, i| path.push(format!("f{i}").into()));
    let shown = Failure { cause: RuntimeError::DivisionByZero,
                          path }.to_string();
    assert!(shown.starts_with("… -> f12 -> f13"), "{shown}");
    assert!(shown.ends_with("f19: division by zero"), "{shown}");

    let short = Failure { cause: RuntimeError::DivisionByZero,
                          path:  CallPath::default().push("main".into()), };
    assert_eq!(short.to_string(), "main: division by zero");
}

#[test]
fn concurrent_evaluations_share_a_module() {
    let script = load("memo fib n => n { 0 => 0; 1 => 1; default => + (fib (- n 1)) (fib (- n 2)); };",
                      &Registry::new()).unwrap();

    let handles: Vec<_> = (0..4).map(|_| {
                                    let script = script.clone();
                                    thread::spawn(move || script.call(&frame(), "fib", &[Func::from(20.0)]))
                                })
                                .collect();

    for handle in handles {
        let result = handle.join().unwrap();
        assert!(result.equals(&Func::from(6765.0)), "got {result}");
    }
}

#[test]
fn reversed_natives_take_the_saved_argument_last() {
    let frame = frame();
    let sub = Func::native_reversed("sub", 2, |frame, args| {
        let a = frame.arg::<f64>(args, 0);
        let b = frame.arg::<f64>(args, 1);
        match (a, b) {
            (Ok(a), Ok(b)) => Func::from(a - b),
            (Err(e), _) | (_, Err(e)) => e.into(),
        }
    });

    let minus_three = sub.call(&frame, &[Func::from(3.0)]);
    assert!(minus_three.call(&frame, &[Func::from(10.0)]).equals(&Func::from(7.0)));

    let frame = frame.with_scope(frame.scope().add("sub", sub));
    assert!(eval("10 -> sub 3", &frame).equals(&Func::from(7.0)));
}

#[test]
fn variadic_natives_receive_every_argument() {
    let frame = frame();
    let count = Func::native_with("count", Arity::AtLeast(1), Order::Prefix, |_, args| {
        Func::from(args.len().to_string())
    });

    assert!(count.call(&frame, &[Func::from(1.0), Func::from(2.0), Func::from(3.0)])
                 .equals(&Func::from("3")));
    assert!(matches!(count.call(&frame, &[]), Func::Native(_)));
}

#[test]
fn typed_native_helpers_convert_arguments() {
    let frame = frame();
    let scope = frame.scope()
                     .add("shout", Func::native_unary("shout", |s: String| s.to_uppercase()))
                     .add("pow", Func::native_binary("pow", f64::powf));
    let frame = frame.with_scope(scope);

    assert!(eval("shout 'hey'", &frame).equals(&Func::from("HEY")));
    assert!(eval("pow 2 10", &frame).equals(&Func::from(1024.0)));
    assert!(eval("2 -> pow 3", &frame).equals(&Func::from(9.0)));

    let mismatch = eval("shout 1", &frame);
    assert!(matches!(cause(&mismatch), RuntimeError::TypeMismatch { expected: "string", .. }));
}

#[test]
fn lookups_fail_as_values() {
    let frame = frame();
    assert!(matches!(cause(&eval("nope", &frame)), RuntimeError::UnknownIdentifier { name } if name == "nope"));
    assert!(matches!(cause(&eval("m.x", &frame)), RuntimeError::UnknownIdentifier { name } if name == "m"));

    let frame = frame.with_scope(Scope::new().add("n", Func::from(1.0)));
    assert!(matches!(cause(&eval("n.x", &frame)), RuntimeError::NotAModule { .. }));
}
