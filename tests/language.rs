use std::{cell::RefCell, io::Write, rc::Rc};

use arrai::{
    ast::{ArithmeticOp, ArrayDescriptor},
    interpreter::{
        evaluator::core::Context,
        lexer::{Token, tokenize},
        parser::core::parse_program,
        value::Value,
    },
};
use walkdir::WalkDir;

#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn run_with_args(source: &str, args: &[&str]) -> Result<String, String> {
    let buffer = SharedBuffer::default();
    let mut context = Context::with_writer(Box::new(buffer.clone()));
    let args: Vec<String> = args.iter().map(|arg| (*arg).to_string()).collect();
    let result = context.run_source(source, &args);
    let output = String::from_utf8_lossy(&buffer.0.borrow()).into_owned();
    match result {
        Ok(()) => Ok(output),
        Err(e) => Err(e.to_string()),
    }
}

fn run_capture(source: &str) -> Result<String, String> {
    run_with_args(source, &[])
}

fn assert_output(source: &str, expected: &str) {
    match run_capture(source) {
        Ok(output) => assert_eq!(output, expected, "Unexpected output for:\n{source}"),
        Err(e) => panic!("Script failed: {e}\n{source}"),
    }
}

fn assert_failure(source: &str) {
    if run_capture(source).is_ok() {
        panic!("Script succeeded but was expected to fail:\n{source}");
    }
}

#[test]
fn demo_programs_run() {
    let mut count = 0;

    for entry in
        WalkDir::new("demos").into_iter()
                             .filter_map(Result::ok)
                             .filter(|e| e.path().extension().is_some_and(|ext| ext == "ints"))
    {
        count += 1;
        let path = entry.path();
        let mut context = Context::with_writer(Box::new(SharedBuffer::default()));
        if let Err(e) = context.run_file(&path.to_string_lossy(), &[]) {
            panic!("Demo {path:?} failed: {e}");
        }
    }

    assert!(count > 0, "No demo programs found in demos/");
}

#[test]
fn print_writes_text_for_displayable_arrays() {
    assert_output("fn main(_: [+]) -> [+] { print(\"Hi\"); }", "Hi");
    assert_output("fn main(_: [+]) -> [+] { print(\"a\\tb\\n\"); }", "a\tb\n");
    assert_output("fn main(_: [+]) -> [+] { print([]); }", "");
}

#[test]
fn print_writes_canonical_form_for_other_arrays() {
    assert_output("fn main(_: [+]) -> [+] { print([1, 2, 3]); }", "[ 1, 2, 3 ]");
    assert_output("fn main(_: [+]) -> [+] { print([-1, 2]); }", "[ -1, 2 ]");
}

#[test]
fn function_call_and_fixed_binding() {
    let source = "fn double(x: [+]) -> [+] { return x + x; }\n\
                  fn main(_: [+]) -> [+] { let y: [3] = double([1,2,3]); print(y); }";
    assert_output(source, "[ 2, 4, 6 ]");
}

#[test]
fn slicing_copies_the_selected_elements() {
    let source = "fn main(_: [+]) -> [+] { let a: [5] = [1,2,3,4,5]; print(a[1:4]); }";
    assert_output(source, "[ 2, 3, 4 ]");
}

#[test]
fn slice_identity_and_open_bounds() {
    let source = "fn main(_: [+]) -> [+] {\n\
                      let a: [5] = [9, 8, 7, 6, 5];\n\
                      if a[0:] == a { print(\"same\"); } else { print(\"diff\"); }\n\
                      if a[:] == a { print(\"same\"); } else { print(\"diff\"); }\n\
                      print(a[3]);\n\
                  }";
    assert_output(source, "samesame[ 6 ]");
}

#[test]
fn range_and_size_builtins() {
    let source = "fn main(_: [+]) -> [+] { let n: [1] = range(4).size(); print(n); }";
    assert_output(source, "[ 4 ]");
    assert_output("fn main(_: [+]) -> [+] { print(range(0).size()); }", "[ 0 ]");
    assert_output("fn main(_: [+]) -> [+] { print(range(7).size()); }", "[ 7 ]");
    assert_output("fn main(_: [+]) -> [+] { print(range(3)); }", "[ 0, 1, 2 ]");
}

#[test]
fn equality_comparison_in_if() {
    let source = "fn main(_: [+]) -> [+] {\n\
                      if [1,2,3] == [1,2,3] { print(\"Y\"); } else { print(\"N\"); }\n\
                  }";
    assert_output(source, "Y");
}

#[test]
fn growable_assignment_respects_the_declared_minimum() {
    let source = "fn main(_: [+]) -> [+] { let g: [2+] = [1,2]; g = [1,2,3,4]; print(g.size()); }";
    assert_output(source, "[ 4 ]");

    let source = "fn main(_: [+]) -> [+] {\n\
                      let g: [5+] = [1,2,3,4,5];\n\
                      g = [1,2,3,4];\n\
                      print(g.size());\n\
                  }";
    assert_failure(source);

    assert_failure("fn main(_: [+]) -> [+] { let g: [5+] = [1,2]; }");
}

#[test]
fn fixed_assignment_requires_equal_length() {
    assert_output("fn main(_: [+]) -> [+] { let a: [2] = [1,2]; a = [3,4]; print(a); }",
                  "[ 3, 4 ]");
    assert_failure("fn main(_: [+]) -> [+] { let a: [2] = [1,2]; a = [3,4,5]; }");
}

#[test]
fn not_equal_requires_every_pair_to_differ() {
    let source = "fn main(_: [+]) -> [+] {\n\
                      if [1,2] != [1,3] { print(\"A\"); } else { print(\"B\"); }\n\
                      if [1,2] != [2,3] { print(\"A\"); } else { print(\"B\"); }\n\
                      if [1,2] != [1,2] { print(\"A\"); } else { print(\"B\"); }\n\
                  }";
    assert_output(source, "BAB");
}

#[test]
fn comparisons_on_different_lengths_are_false() {
    let source = "fn main(_: [+]) -> [+] {\n\
                      if [1,2] == [1,2,3] { print(\"eq\"); } else { print(\"ne\"); }\n\
                      if [1,2] < [2,3,4] { print(\"lt\"); } else { print(\"ge\"); }\n\
                  }";
    assert_output(source, "nege");
}

#[test]
fn ordering_comparisons_are_elementwise_over_all_pairs() {
    let source = "fn main(_: [+]) -> [+] {\n\
                      if [1,2] < [2,3] { print(\"a\"); } else { print(\"b\"); }\n\
                      if [1,5] < [2,3] { print(\"a\"); } else { print(\"b\"); }\n\
                      if [3,3] >= [3,2] { print(\"a\"); } else { print(\"b\"); }\n\
                  }";
    assert_output(source, "aba");
}

#[test]
fn arithmetic_is_elementwise_and_length_checked() {
    assert_output("fn main(_: [+]) -> [+] { print([4,5,6] - [1,2,3]); }", "[ 3, 3, 3 ]");
    assert_output("fn main(_: [+]) -> [+] { print([2,3] * [4,5]); }", "[ 8, 15 ]");
    assert_output("fn main(_: [+]) -> [+] { print([9,8] / [3,2]); }", "[ 3, 4 ]");
    assert_failure("fn main(_: [+]) -> [+] { let x: [] = [1,2] + [1,2,3]; }");
    assert_failure("fn main(_: [+]) -> [+] { let x: [] = [1] / [0]; }");
}

#[test]
fn arithmetic_wraps_on_overflow() {
    assert_output("fn main(_: [+]) -> [+] { print([2147483647] + [1]); }", "[ -2147483648 ]");
}

#[test]
fn arithmetic_precedence_and_parentheses() {
    assert_output("fn main(_: [+]) -> [+] { print([1] + [2] * [3]); }", "[ 7 ]");
    assert_output("fn main(_: [+]) -> [+] { print(([1] + [2]) * [3]); }", "[ 9 ]");
    assert_output("fn main(_: [+]) -> [+] { print([8] - [4] - [2]); }", "[ 2 ]");
}

#[test]
fn bare_integers_are_one_element_arrays() {
    assert_output("fn main(_: [+]) -> [+] { print(range(4).size()); }", "[ 4 ]");
    assert_output("fn main(_: [+]) -> [+] { print(1 + 2 * 3); }", "[ 7 ]");
}

#[test]
fn methods_append_sqrt_size() {
    assert_output("fn main(_: [+]) -> [+] { print([72].append([105]).append([33])); }", "Hi!");
    assert_output("fn main(_: [+]) -> [+] { print([16, 25, 2].sqrt()); }", "[ 4, 5, 1 ]");
    assert_output("fn main(_: [+]) -> [+] { print([].size()); }", "[ 0 ]");
    assert_failure("fn main(_: [+]) -> [+] { let x: [] = [1].reverse(); }");
    assert_failure("fn main(_: [+]) -> [+] { let x: [] = [1].sqrt([2]); }");
}

#[test]
fn descriptors_without_initializers() {
    assert_output("fn main(_: [+]) -> [+] { let buf: [3+]; print(buf); }", "[ 0, 0, 0 ]");
    assert_output("fn main(_: [+]) -> [+] { let buf: [+]; print(buf.size()); }", "[ 0 ]");
    assert_failure("fn main(_: [+]) -> [+] { let buf: [3+] = []; }");
    assert_failure("fn main(_: [+]) -> [+] { let buf: [3]; }");
    assert_failure("fn main(_: [+]) -> [+] { let buf: []; }");
}

#[test]
fn for_loop_binds_single_elements() {
    let source = "fn main(_: [+]) -> [+] {\n\
                      let total: [1] = [0];\n\
                      for x : [1, 2, 3, 4] { total = total + x; }\n\
                      print(total);\n\
                  }";
    assert_output(source, "[ 10 ]");
}

#[test]
fn for_loop_short_circuits_on_return() {
    let source = "fn first(data: [+]) -> [1] {\n\
                      for x : data { return x; }\n\
                      return [-1];\n\
                  }\n\
                  fn main(_: [+]) -> [+] { print(first([42, 7])); print(first([])); }";
    assert_output(source, "[ 42 ][ -1 ]");
}

#[test]
fn while_loop_counts_down() {
    let source = "fn main(_: [+]) -> [+] {\n\
                      let n: [1] = [3];\n\
                      while [0] < n {\n\
                          print(n);\n\
                          n = n - [1];\n\
                      }\n\
                  }";
    assert_output(source, "[ 3 ][ 2 ][ 1 ]");
}

#[test]
fn while_condition_binding_is_defined_once() {
    // The while scope is created once; the if-let binding from the first
    // iteration survives, so x keeps its original two elements even after
    // g has grown.
    let source = "fn main(_: [+]) -> [+] {\n\
                      let g: [+] = [1, 2];\n\
                      let rounds: [1] = [0];\n\
                      while let x: [2+] = g {\n\
                          rounds = rounds + [1];\n\
                          if rounds == [3] { print(x.size()); return []; }\n\
                          g = g.append([9]);\n\
                      }\n\
                  }";
    assert_output(source, "[ 2 ]");
}

#[test]
fn if_let_checks_descriptor_compatibility() {
    let source = "fn main(_: [+]) -> [+] {\n\
                      if let pair: [2] = [7, 8] { print(pair); } else { print(\"no\"); }\n\
                      if let triple: [3] = [7, 8] { print(triple); } else { print(\"no\"); }\n\
                      if let any: [+] = [] { print(\"always\"); }\n\
                      if let grown: [1+] = [] { print(\"yes\"); } else { print(\"short\"); }\n\
                  }";
    assert_output(source, "[ 7, 8 ]noalwaysshort");
}

#[test]
fn else_if_chains_take_the_first_matching_branch() {
    let source = "fn pick(n: [1]) -> [+] {\n\
                      if n == [1] { return \"one\"; }\n\
                      else if n == [2] { return \"two\"; }\n\
                      else { return \"many\"; }\n\
                  }\n\
                  fn main(_: [+]) -> [+] {\n\
                      print(pick([1])); print(pick([2])); print(pick([9]));\n\
                  }";
    assert_output(source, "onetwomany");
}

#[test]
fn recursion_works() {
    let source = "fn fact(n: [1]) -> [1] {\n\
                      if n == [0] { return [1]; }\n\
                      return n * fact(n - [1]);\n\
                  }\n\
                  fn main(_: [+]) -> [+] { print(fact([5])); }";
    assert_output(source, "[ 120 ]");
}

#[test]
fn function_bodies_see_their_callers_scope() {
    // Scopes parent on the call site, so a helper reads the caller's
    // local binding. This is the language's dynamic-scoping rule.
    let source = "fn helper() -> [+] { return secret; }\n\
                  fn main(_: [+]) -> [+] {\n\
                      let secret: [3] = [1, 2, 3];\n\
                      print(helper().size());\n\
                  }";
    assert_output(source, "[ 3 ]");
}

#[test]
fn function_bindings_can_be_reassigned_to_functions() {
    let source = "fn one() -> [1] { return [1]; }\n\
                  fn two() -> [1] { return [2]; }\n\
                  fn main(_: [+]) -> [+] { one = two; print(one()); }";
    assert_output(source, "[ 2 ]");

    assert_failure("fn one() -> [1] { return [1]; }\n\
                    fn main(_: [+]) -> [+] { one = [5]; }");
    assert_failure("fn one() -> [1] { return [1]; }\n\
                    fn main(_: [+]) -> [+] { let x: [] = one + [1]; }");
}

#[test]
fn user_definitions_shadow_builtins() {
    let source = "fn print(x: [+]) -> [+] { return x; }\n\
                  fn main(_: [+]) -> [+] { print(\"nope\"); }";
    assert_output(source, "");
}

#[test]
fn top_level_bindings_and_calls_are_ignored() {
    let source = "let ignored: [1] = [1];\n\
                  print(\"nope\");\n\
                  fn main(_: [+]) -> [+] { print(\"ran\"); }";
    assert_output(source, "ran");
}

#[test]
fn main_receives_argument_count_and_flattened_bytes() {
    let source = "fn main(argc: [1], data: [+]) -> [+] { print(argc); print(data); }";
    match run_with_args(source, &["ab", "c"]) {
        Ok(output) => assert_eq!(output, "[ 2 ][ 2, 97, 98, 1, 99 ]"),
        Err(e) => panic!("Script failed: {e}"),
    }

    // A one-parameter main receives only the count array.
    let source = "fn main(args: [+]) -> [+] { print(args); }";
    match run_with_args(source, &["x"]) {
        Ok(output) => assert_eq!(output, "[ 1 ]"),
        Err(e) => panic!("Script failed: {e}"),
    }
}

#[test]
fn programs_without_main_load_silently() {
    assert_output("fn helper() -> [+] { return []; }", "");
}

#[test]
fn runtime_errors_abort_the_run() {
    assert_failure("fn main(_: [+]) -> [+] { missing(); }");
    assert_failure("fn main(_: [+]) -> [+] { let x: [] = ghost; }");
    assert_failure("fn main(_: [+]) -> [+] { ghost = [1]; }");
    assert_failure("fn f(a: [1]) -> [+] { return a; }\n\
                    fn main(_: [+]) -> [+] { f([1], [2]); }");
    assert_failure("fn main(_: [+]) -> [+] { let a: [3] = [1, 2]; }");
    assert_failure("fn main(_: [+]) -> [+] { let a: [2] = [1, 2]; print(a[1:5]); }");
    assert_failure("fn main(_: [+]) -> [+] { let a: [2] = [1, 2]; print(a[2:1]); }");
    assert_failure("fn main(_: [+]) -> [+] { print(range([0] - [1])); }");
    assert_failure("fn main(_: [+]) -> [+] { print(range([1, 2])); }");
}

#[test]
fn lex_errors_abort_the_run() {
    assert_failure("fn main(_: [+]) -> [+] { print(\"\\q\"); }");
    assert_failure("fn main(_: [+]) -> [+] { print(\"open");
    assert_failure("fn main(_: [+]) -> [+] { let a: [1] = [99999999999]; }");
    assert_failure("fn main(_: [+]) -> [+] { @ }");
}

#[test]
fn parse_errors_abort_the_run() {
    assert_failure("fn main(_: [+]) -> [+] { print(\"x\") }");
    assert_failure("fn main(_: [+]) -> [+] { let a [1] = [1]; }");
    assert_failure("fn main(_: [+]) { }");
    assert_failure("fn main(_: [+]) -> [+] { if [1] = [1] { } }");
    assert_failure("fn main(_: [+]) -> [+] { let x: [] = ([1] + [2]; }");
}

#[test]
fn string_escapes_decode_at_lex_time() {
    let tokens = tokenize(r#""\n\t\0""#).unwrap();
    assert_eq!(tokens[0].0, Token::Text("\n\t\0".to_string()));

    let tokens = tokenize("\"a\\\"b\\\\c\"").unwrap();
    assert_eq!(tokens[0].0, Token::Text("a\"b\\c".to_string()));
}

#[test]
fn strings_may_span_lines_and_count_them() {
    let tokens = tokenize("\"a\nb\"\nlet").unwrap();
    assert_eq!(tokens[0].0, Token::Text("a\nb".to_string()));
    // The identifier after two newlines sits on line 3.
    assert_eq!(tokens[1], (Token::Identifier("let".to_string()), 3));
}

#[test]
fn canonical_printer_round_trips() {
    let source = "use <vectors>\n\
                  fn helper(data: [2+], scale: [1]) -> [+] {\n\
                      let copy: [] = data;\n\
                      let tail: [+] = copy[1:];\n\
                      if tail.size() == [1] {\n\
                          return tail;\n\
                      } else if tail.size() > [1] {\n\
                          while let probe: [1+] = tail {\n\
                              return probe[0:1];\n\
                          }\n\
                      } else {\n\
                          for element : data {\n\
                              copy = copy.append(element * scale);\n\
                          }\n\
                      }\n\
                      return (data + data) * helper(data, scale);\n\
                  }\n\
                  fn main(argc: [1], data: [+]) -> [+] {\n\
                      let seed: [4] = [-3, 0, 7, 127];\n\
                      print(helper(seed[0:2].append(range(2)), 5));\n\
                      print(\"done\\n\");\n\
                  }";

    let canonical = |text: &str| {
        parse_program(&tokenize(text).expect("tokenize")).expect("parse")
                                                         .to_string()
    };

    let first = canonical(source);
    let second = canonical(&first);
    assert_eq!(first, second);
}

#[test]
fn fixed_descriptor_construction_invariants() {
    for n in 0..6 {
        let descriptor = ArrayDescriptor { size:     Some(n),
                                           can_grow: false, };
        let value =
            Value::from_descriptor(&descriptor, Some(Value::growable(vec![7; n])), 1).unwrap();
        assert_eq!(value.len(), n);
        assert_eq!(value.minimum, n);
    }
}

#[test]
fn growable_values_keep_their_minimum_across_assignments() {
    let descriptor = ArrayDescriptor { size:     Some(2),
                                       can_grow: true, };
    let mut value =
        Value::from_descriptor(&descriptor, Some(Value::growable(vec![1, 2, 3])), 1).unwrap();
    assert_eq!(value.minimum, 2);

    for contents in [vec![5, 6], vec![1, 2, 3, 4, 5], vec![0, 0, 0]] {
        value.assign(&Value::growable(contents), 1).unwrap();
        assert_eq!(value.minimum, 2);
        assert!(value.len() >= 2);
    }

    assert!(value.assign(&Value::growable(vec![9]), 1).is_err());
}

#[test]
fn addition_is_elementwise_commutative_and_associative() {
    let a = Value::growable(vec![1, -2, 30]);
    let b = Value::growable(vec![4, 5, -6]);
    let c = Value::growable(vec![7, 0, 9]);

    let ab = a.arithmetic(ArithmeticOp::Add, &b, 1).unwrap();
    let ba = b.arithmetic(ArithmeticOp::Add, &a, 1).unwrap();
    assert_eq!(ab.as_slice(), &[5, 3, 24]);
    assert_eq!(ab.as_slice(), ba.as_slice());

    let ab_c = ab.arithmetic(ArithmeticOp::Add, &c, 1).unwrap();
    let bc = b.arithmetic(ArithmeticOp::Add, &c, 1).unwrap();
    let a_bc = a.arithmetic(ArithmeticOp::Add, &bc, 1).unwrap();
    assert_eq!(ab_c.as_slice(), a_bc.as_slice());
}

#[test]
fn read_builtin_returns_file_bytes() {
    let path = std::env::temp_dir().join("arrai_read_test.txt");
    std::fs::write(&path, "hi").unwrap();

    let source = format!("fn main(_: [+]) -> [+] {{\n\
                              let data: [+] = read(\"{}\");\n\
                              print(data.size());\n\
                              print(data);\n\
                          }}",
                         path.display());
    assert_output(&source, "[ 2 ]hi");

    assert_failure("fn main(_: [+]) -> [+] { let x: [] = read(\"/no/such/arrai/file\"); }");
}

#[test]
fn module_loader_includes_each_file_once() {
    let dir = std::env::temp_dir();
    let first = dir.join("arrai_mod_a.ints");
    let second = dir.join("arrai_mod_b.ints");

    std::fs::write(&first,
                   format!("use \"{}\"\nfn alpha() -> [1] {{ return [1]; }}", second.display()))
        .unwrap();
    std::fs::write(&second,
                   format!("use \"{}\"\nfn beta() -> [1] {{ return [2]; }}", first.display()))
        .unwrap();

    // The circular `use` terminates because each file is loaded at most
    // once, and both definitions are visible afterwards.
    let source = format!("use \"{}\"\n\
                          fn main(_: [+]) -> [+] {{ print(alpha() + beta()); }}",
                         first.display());
    assert_output(&source, "[ 3 ]");
}

#[test]
fn missing_include_fails() {
    assert_failure("use \"/no/such/arrai/module.ints\"\n\
                    fn main(_: [+]) -> [+] { }");
}
