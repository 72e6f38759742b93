use gobasics::check_source;
use gobasics::interpreter::{RunConfig, RuntimeError, run};

fn run_with_seed(input: &str, seed: u64) -> String {
    let program = check_source(input).expect("program should check");
    let mut out = Vec::new();
    run(&program, &RunConfig { seed }, &mut out).expect("program should run");
    String::from_utf8(out).expect("output should be utf-8")
}

fn run_program(input: &str) -> String {
    run_with_seed(input, RunConfig::default().seed)
}

#[test]
fn println_separates_operands_with_spaces() {
    assert_eq!(run_program("fmt.Println(\"a\", 1, true, 2.5)\n"), "a 1 true 2.5\n");
}

#[test]
fn println_without_arguments_prints_newline() {
    assert_eq!(run_program("fmt.Println()\n"), "\n");
}

#[test]
fn println_keeps_spaces_inside_strings() {
    assert_eq!(run_program("fmt.Println(\"In stock: \", true)\n"), "In stock:  true\n");
}

#[test]
fn zero_values() {
    let output = run_program("var i int\nvar f float64\nvar s string\nvar b bool\nfmt.Println(i, f, s, b)\n");
    assert_eq!(output, "0 0  false\n");
}

#[test]
fn assignment_replaces_value() {
    let output = run_program("var price float32 = 275.00\nfmt.Println(price)\nprice = 300\nfmt.Println(price)\n");
    assert_eq!(output, "275\n300\n");
}

#[test]
fn parallel_assignment_reads_before_writing() {
    let output = run_program("a, b := 1, 2\na, b = b, a\nfmt.Println(a, b)\n");
    assert_eq!(output, "2 1\n");
}

#[test]
fn short_declaration_reassigns_existing_variable() {
    let output = run_program("tax := 27.50\nprice, tax := 200.00, 25.00\nfmt.Println(price, tax)\n");
    assert_eq!(output, "200 25\n");
}

#[test]
fn float32_arithmetic_rounds_to_single_precision() {
    let output = run_program("var f float32 = 0.1\nf = f + 0.2\nfmt.Println(f)\n");
    assert_eq!(output, "0.3\n");

    let output = run_program("var d float64 = 0.1\nd = d + 0.2\nfmt.Println(d)\n");
    assert_eq!(output, "0.30000000000000004\n");
}

#[test]
fn float_division_by_zero_is_infinite() {
    let output = run_program("a := 1.0\nb := 0.0\nfmt.Println(a / b, -a / b)\n");
    assert_eq!(output, "+Inf -Inf\n");
}

#[test]
fn integers_wrap_around() {
    let output = run_program("var b uint8 = 255\nb++\nfmt.Println(b)\n");
    assert_eq!(output, "0\n");

    let output = run_program("var i int8 = -128\ni--\nfmt.Println(i)\n");
    assert_eq!(output, "127\n");
}

#[test]
fn integer_division_truncates() {
    let output = run_program("a := 7\nfmt.Println(a / 2, -a / 2)\n");
    assert_eq!(output, "3 -3\n");
}

#[test]
fn conversions() {
    let output = run_program("q := 7\nfmt.Println(float32(q) / 2)\nf := 2.7\nfmt.Println(int(f))\n");
    assert_eq!(output, "3.5\n2\n");
}

#[test]
fn runes_print_as_numbers() {
    assert_eq!(run_program("r := 'a'\nfmt.Println(r)\n"), "97\n");
}

#[test]
fn rune_escapes_decode_to_code_points() {
    assert_eq!(
        run_program("fmt.Println('\\x41', '\\101', '\\u00e9', '\\U0001F600')\n"),
        "65 65 233 128512\n"
    );
}

#[test]
fn negated_zero_constant_prints_zero() {
    assert_eq!(run_program("fmt.Println(-0.0)\nconst z float32 = -0.0\nfmt.Println(z)\n"), "0\n0\n");
}

#[test]
fn negated_zero_variable_keeps_its_sign() {
    assert_eq!(run_program("y := 0.0\nfmt.Println(-y)\n"), "-0\n");
}

#[test]
fn string_concatenation() {
    let output = run_program("s := \"Hello, \" + \"world\"\nfmt.Println(s + \"!\")\n");
    assert_eq!(output, "Hello, world!\n");
}

#[test]
fn comparisons_print_booleans() {
    let output = run_program("a := 3\nfmt.Println(a < 5, a == 4, \"a\" != \"b\")\n");
    assert_eq!(output, "true false true\n");
}

#[test]
fn counter_loop() {
    let output = run_program("for i := 0; i < 5; i++ {\n    fmt.Println(i)\n}\n");
    assert_eq!(output, "0\n1\n2\n3\n4\n");
}

#[test]
fn condition_only_loop() {
    let output = run_program("n := 0\nfor n < 3 {\n    n++\n}\nfmt.Println(n)\n");
    assert_eq!(output, "3\n");
}

#[test]
fn loop_body_scope_is_fresh_each_iteration() {
    let output = run_program(
        "total := 0\nfor i := 1; i <= 3; i++ {\n    step := i * 10\n    total = total + step\n}\nfmt.Println(total)\n",
    );
    assert_eq!(output, "60\n");
}

#[test]
fn shadowing_does_not_leak() {
    let output = run_program(
        "x := 1\nfor i := 0; i < 1; i++ {\n    x := \"inner\"\n    fmt.Println(x, i)\n}\nfmt.Println(x)\n",
    );
    assert_eq!(output, "inner 0\n1\n");
}

#[test]
fn rand_is_deterministic_per_seed() {
    let input = "fmt.Println(rand.Int())\nfmt.Println(rand.Int())\n";
    let first = run_with_seed(input, 7);
    let second = run_with_seed(input, 7);
    assert_eq!(first, second);

    for line in first.lines() {
        let value: i64 = line.parse().expect("rand.Int should print an integer");
        assert!(value >= 0);
    }
}

#[test]
fn rand_differs_between_seeds() {
    let input = "fmt.Println(rand.Int())\n";
    assert_ne!(run_with_seed(input, 1), run_with_seed(input, 2));
}

#[test]
fn integer_division_by_zero_panics_at_runtime() {
    let program = check_source("fmt.Println(\"before\")\nx := 0\nfmt.Println(1 / x)\n")
        .expect("program should check");
    let mut out = Vec::new();
    let err = run(&program, &RunConfig::default(), &mut out).expect_err("expected panic");

    assert!(matches!(err, RuntimeError::DivisionByZero { .. }));
    assert!(err.to_string().contains("panic: runtime error: integer divide by zero"));
    assert_eq!(String::from_utf8(out).unwrap(), "before\n");
}

/// Compares `a+b` with `b+a`, `a*b` with `b*a` and both groupings of `+` and
/// `*` over three values declared with `decl` (`var` or `const`) and type `ty`.
fn laws_program(decl: &str, ty: &str, [a, b, c]: [&str; 3]) -> String {
    format!(
        "{decl} a {ty} = {a}\n{decl} b {ty} = {b}\n{decl} c {ty} = {c}\n\
         fmt.Println(a+b == b+a, a*b == b*a, (a+b)+c == a+(b+c), (a*b)*c == a*(b*c))\n"
    )
}

// Float values are chosen so every intermediate result is exact.
const INT_SETS: [[&str; 3]; 3] = [["2", "3", "4"], ["-7", "11", "0"], ["123456789", "-987654321", "42"]];
const FLOAT_SETS: [[&str; 3]; 3] = [
    ["275", "27.5", "0.25"],
    ["-1.5", "8", "0.125"],
    ["1024", "-3.75", "2"],
];

#[test]
fn addition_and_multiplication_commute_and_associate_on_variables() {
    let cases = INT_SETS
        .iter()
        .map(|set| ("int", *set))
        .chain(FLOAT_SETS.iter().map(|set| ("float32", *set)))
        .chain(FLOAT_SETS.iter().map(|set| ("float64", *set)))
        .chain([("int8", ["100", "100", "3"])]);

    for (ty, set) in cases {
        let input = laws_program("var", ty, set);
        assert_eq!(run_program(&input), "true true true true\n", "{ty} {set:?}");
    }
}

#[test]
fn addition_and_multiplication_commute_and_associate_on_constants() {
    let cases = INT_SETS
        .iter()
        .map(|set| ("int", *set))
        .chain(INT_SETS.iter().map(|set| ("", *set)))
        .chain(FLOAT_SETS.iter().map(|set| ("float32", *set)))
        .chain(FLOAT_SETS.iter().map(|set| ("float64", *set)))
        .chain(FLOAT_SETS.iter().map(|set| ("", *set)));

    for (ty, set) in cases {
        let input = laws_program("const", ty, set);
        assert_eq!(run_program(&input), "true true true true\n", "{ty:?} {set:?}");
    }
}
