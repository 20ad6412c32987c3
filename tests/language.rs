use std::{fs, sync::Arc, thread};

use wdte::{
    error::{Error, RuntimeError, TranslateError},
    get_result,
    interpreter::{
        import::Registry,
        value::{frame::Frame, func::Func, module::Module},
    },
    load, prelude,
};
use walkdir::WalkDir;

#[test]
fn book_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("book/src").into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, code) in extract_dsl_blocks(&content).into_iter().enumerate() {
            count += 1;
            if let Err(e) = get_result(&code, "main") {
                panic!("DSL example {} in {:?} failed:\n{}\nError: {:?}",
                       i + 1,
                       path,
                       code,
                       e);
            }
        }
    }

    assert!(count > 0, "No DSL examples found in book/src");
}

fn extract_dsl_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```wdte") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

fn assert_success(src: &str) {
    if let Err(e) = get_result(src, "main") {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) {
    if get_result(src, "main").is_ok() {
        panic!("Script succeeded but was expected to fail")
    }
}

fn assert_result(src: &str, expected: impl Into<Func>) {
    let expected = expected.into();
    match get_result(src, "main") {
        Ok(value) => assert!(value.equals(&expected), "expected {expected}, got {value}"),
        Err(e) => panic!("Script failed: {e}"),
    }
}

#[test]
fn literals_and_arithmetic() {
    assert_result("main => 3;", 3.0);
    assert_result("main => 'single';", "single");
    assert_result("main => \"double\";", "double");
    assert_result("main => + 1 2;", 3.0);
    assert_result("main => + 1 2 3 4;", 10.0);
    assert_result("main => - 10 4;", 6.0);
    assert_result("main => * 2 3 4;", 24.0);
    assert_result("main => / 9 2;", 4.5);
    assert_result("main => % 9 4;", 1.0);
    assert_result("main => + -1 1;", 0.0);
}

#[test]
fn string_concatenation() {
    assert_result("main => + 'n = ' 3;", "n = 3");
    assert_result("main => + 'a' 'b' 'c';", "abc");
}

#[test]
fn comparisons_and_logic() {
    assert_result("main => == 2 2;", true);
    assert_result("main => == 'a' 'b';", false);
    assert_result("main => == [1; 2] [1; 2];", true);
    assert_result("main => < 2 3;", true);
    assert_result("main => >= 'b' 'a';", true);
    assert_result("main => ! false;", true);
    assert_result("main => && true true false;", false);
    assert_result("main => || false true;", true);
}

#[test]
fn user_defined_functions_and_calls() {
    assert_result("square x => * x x; main => square 3;", 9.0);
    assert_result("add a b => + a b; main => add 2 5;", 7.0);
    assert_result("add a b => + a b; add2 => add 2; main => add2 5;", 7.0);
}

#[test]
fn declarations_see_each_other() {
    assert_result("even n => n { 0 => true; default => odd (- n 1); };
                   odd n => n { 0 => false; default => even (- n 1); };
                   main => even 10;",
                  true);
}

#[test]
fn memoized_fibonacci() {
    assert_result("memo fib n => n { 0 => 0; 1 => 1; default => + (fib (- n 1)) (fib (- n 2)); };
                   main => fib 10;",
                  55.0);
    assert_result("memo fib n => n { 0 => 0; 1 => 1; default => + (fib (- n 1)) (fib (- n 2)); };
                   main => fib 30;",
                  832_040.0);
}

#[test]
fn switch_falls_back_to_the_subject() {
    assert_result("main => 5 { == 3 => 'three'; };", 5.0);
    assert_result("main => 3 { == 3 => 'three'; default => 'other'; };", "three");
    assert_result("sign n => n { 0 => 0; > 0 => -1; default => 1; }; main => sign -4;", -1.0);
}

#[test]
fn switch_sides_are_called_with_the_subject() {
    assert_result("main => 3 { default => + 1; };", 4.0);
    assert_result("main => 3 { < 0 => * 2; };", 6.0);
    assert_result("main => 3 { (@ odd n => % n 2 -> == 1) => 'odd'; };", "odd");
}

#[test]
fn decimals_beside_symbols() {
    assert_result("main => [1.5; 2] -> at 0;", 1.5);
    assert_result("main => (2.5);", 2.5);
    assert_result("main => + -1.5 1;", -0.5);
    assert_result("main => * 2 (0.25);", 0.5);
}

#[test]
fn deep_recursion_through_builtins() {
    let worker = thread::Builder::new().stack_size(256 * 1024 * 1024)
                                       .spawn(|| {
                                           get_result("count n => n { 0 => 'done'; default => count (- n 1); };
                                                       main => count 300;",
                                                      "main").map(|value| value.to_string())
                                                             .map_err(|e| e.to_string())
                                       })
                                       .unwrap();

    assert_eq!(worker.join().unwrap(), Ok("done".to_string()));
}

#[test]
fn memo_keys_distinct_functions_apart() {
    let expected = Func::from(vec![Func::from("first"), Func::from("second")]);
    assert_result("memo f g => g 0; main => [f (@ a x => 'first'); f (@ b x => 'second')];",
                  expected);
}

#[test]
fn let_bindings() {
    assert_result("main => (let x => 3; (let x => 5); x);", 3.0);
    assert_result("main => (let x => 3);", 3.0);
    assert_result("main => (let x => 3; let x => + x 5; x);", 8.0);
    assert_result("main => (let double n => * n 2; double 4);", 8.0);
    assert_result("main => (let down n => n { 0 => 'down'; default => down (- n 1); }; down 3);", "down");
    assert_result("main => (@ f x => let y => * x 10; + y 1) 2;", 21.0);
}

#[test]
fn destructuring() {
    let swapped = || Func::from(vec![Func::from(5.0), Func::from(3.0)]);
    assert_result("main => (let [a b] => [3; 5]; [b; a]);", swapped());
    assert_result("main => [3; 5] : a -> a : [x y] -> [y; x];", swapped());
    assert_result("main => (let [a] => [1; 2; 3]; a);", 1.0);
    assert_failure("main => (let [a b] => [1]; a);");
    assert_failure("main => (let [a] => 3; a);");
    assert_failure("main => 3 : [a] -> a;");
}

#[test]
fn collectors_and_member_expressions() {
    assert_result("main => (| let x => 1; let f n => + n x).f 2;", 3.0);
    assert_result("point x y => (| let x => x; let y => y); main => (point 3 4).(+ (* x x) (* y y));",
                  25.0);
    assert_result("main => (| let x => 1; 'not bound').x;", 1.0);
    assert_failure("main => (| let x => 1).y;");
    assert_failure("main => (| let x => / 1 0).x;");
}

#[test]
fn member_expressions_on_imports() {
    let math = Arc::new(Module::new().with("pi", Func::from(3.0))
                                     .with("double", Func::native_unary("double", |n: f64| n * 2.0)));
    let registry = Registry::new().with("math", math);

    let module = load("'math' => m; main => [m.(double pi); (m).double 5];", &registry).unwrap();
    let result = module.call(&Frame::new(prelude()), "main", &[]);
    assert!(result.equals(&Func::from(vec![Func::from(6.0), Func::from(10.0)])), "got {result}");
}

#[test]
fn chains() {
    assert_result("main => 5 -> + 2 -- * 3;", 7.0);
    assert_result("main => 5 -> + 2 -> * 3;", 21.0);
    assert_result("main => 1 : one -> + 1 -> + one;", 3.0);
    assert_result("main => error 'boom' -> + 1 -| 'recovered';", "recovered");
    assert_result("main => 4 -| 'unused';", 4.0);
}

#[test]
fn lambdas_and_closures() {
    assert_result("apply f x => f x; main => apply (@ double n => * n 2) 21;", 42.0);
    assert_result("adder n => (@ add x => + x n); main => adder 3 4;", 7.0);
    assert_result("main => (@ count n => n { 0 => 'done'; default => count (- n 1); }) 5;", "done");
    assert_result("main => (@ both a b => + a b; * a b) 3 4;", 12.0);
}

#[test]
fn compounds_and_arrays() {
    assert_result("main => (1; 2; 3);", 3.0);
    assert_result("main => [1; 2; 3] -> at 1;", 2.0);
    assert_result("main => at [1; 2; 3] 2;", 3.0);
    assert_result("main => len [1; [2; 3]; 'x'];", 3.0);
    assert_result("main => at 'hello' 1;", "e");
    assert_result("main => [];", Vec::<Func>::new());
}

#[test]
fn arguments_are_lazy() {
    assert_result("first a b => a; main => first 1 (error 'never forced');", 1.0);
    assert_result("main => || true (error 'never forced');", true);
}

#[test]
fn imports_through_a_registry() {
    let math = Arc::new(Module::new().with("pi", Func::from(std::f64::consts::PI))
                                     .with("double", Func::native_unary("double", |n: f64| n * 2.0)));
    let helpers = load("inc n => + n 1; twice f x => f (f x);", &Registry::new()).unwrap();
    let registry = Registry::new().with("math", math).with("helpers", helpers);

    let module = load("'math' => m; 'helpers' => h; main => h.twice h.inc (m.double 20);", &registry).unwrap();
    let result = module.call(&Frame::new(prelude()), "main", &[]);
    assert!(result.equals(&Func::from(42.0)), "got {result}");
}

#[test]
fn imported_modules_resolve_their_own_names() {
    let lib = load("helper => 'inner'; exposed => helper;", &Registry::new()).unwrap();
    let registry = Registry::new().with("lib", lib);

    let module = load("'lib' => l; helper => 'outer'; main => l.exposed;", &registry).unwrap();
    let result = module.call(&Frame::new(prelude()), "main", &[]);
    assert!(result.equals(&Func::from("inner")), "got {result}");
}

#[test]
fn unknown_import_is_a_translation_error() {
    let err = get_result("'nowhere' => n; main => 1;", "main").unwrap_err();
    assert!(matches!(err, Error::Translate(TranslateError::Import { .. })));
}

#[test]
fn runtime_errors_carry_their_cause_and_path() {
    let Err(Error::Runtime(failure)) = get_result("f x => / x 0; main => f 1;", "main") else {
        panic!("expected a runtime error");
    };
    assert_eq!(failure.cause, RuntimeError::DivisionByZero);
    let path: Vec<String> = failure.path.names().iter().map(ToString::to_string).collect();
    assert_eq!(path, vec!["main", "f", "/"]);
}

#[test]
fn division_by_zero_is_error() {
    assert_failure("main => / 1 0;");
}

#[test]
fn unknown_identifier_is_error() {
    assert_failure("main => + foo 1;");
}

#[test]
fn unknown_entry_is_error() {
    assert_failure("other => 1;");
}

#[test]
fn out_of_range_index_is_error() {
    assert_failure("main => [1; 2; 3] -> at 3;");
    assert_failure("main => at [1] 0.5;");
}

#[test]
fn type_mismatch_is_error() {
    assert_failure("main => - 'a' 1;");
    assert_failure("main => ! 1;");
}

#[test]
fn member_access_on_a_value_is_error() {
    assert_failure("x => 1; main => x.y;");
}

#[test]
fn syntax_error_is_error() {
    assert_failure("main => ;");
    assert_failure("main => (1; 2;");
    assert_failure("main => 'unterminated;");
}

#[test]
fn printing_returns_its_argument() {
    assert_success("main => 3 -- print 'three:';");
    assert_result("main => print 'a' 'b';", "b");
}
