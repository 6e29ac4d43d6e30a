use crate::core::ast::AstNode;
use crate::core::types::{AstType, FunctionShape, NumberSize, TypePath};
use crate::cst::{CstKind, CstNode};
use crate::error::ErrorCode;
use crate::semantic::SymbolKind;
use crate::tests::{analyzer, branch, leaf, span};

fn keyword(kind: CstKind, value: &str, start: u32, end: u32, children: Vec<CstNode>) -> CstNode {
    CstNode::new(kind, span(start, end))
        .with_value(value)
        .with_children(children)
}

fn program(end: u32, children: Vec<CstNode>) -> CstNode {
    branch(CstKind::Program, 0, end, children)
}

fn integer_types() -> Vec<AstType> {
    NumberSize::INTEGERS
        .iter()
        .copied()
        .map(AstType::Number)
        .collect()
}

fn first_declaration(ast: AstNode) -> AstNode {
    match ast {
        AstNode::Program(program) => program
            .declarations
            .into_iter()
            .next()
            .expect("program should hold a declaration"),
        other => panic!("expected a program, got {other:?}"),
    }
}

#[test]
fn const_with_integer_initializer_gets_every_integer_size() {
    let source = "const x = 1;";
    let cst = program(
        12,
        vec![keyword(
            CstKind::VariableDeclaration,
            "const",
            0,
            12,
            vec![
                leaf(CstKind::Identifier, "x", 6, 7),
                leaf(CstKind::AssignmentOperator, "=", 8, 9),
                leaf(CstKind::NumberLiteral, "1", 10, 11),
                leaf(CstKind::SemicolonSeparator, ";", 11, 12),
            ],
        )],
    );

    let mut analyzer = analyzer(source);
    let ast = analyzer.analyze(&cst).expect("lowering should succeed");

    match first_declaration(ast) {
        AstNode::VariableDeclaration(decl) => {
            assert!(!decl.mutable);
            assert_eq!(decl.identifier.name, "x");
            assert_eq!(decl.inferred_types, integer_types());
        }
        other => panic!("expected a variable declaration, got {other:?}"),
    }

    let symbol = analyzer.symbol_table().lookup("x").expect("x is defined");
    assert_eq!(symbol.kind, SymbolKind::Variable { mutable: false });
    assert_eq!(symbol.types, integer_types());
}

#[test]
fn negative_initializer_excludes_unsigned_sizes() {
    let source = "const x = -2;";
    let cst = program(
        13,
        vec![keyword(
            CstKind::VariableDeclaration,
            "const",
            0,
            13,
            vec![
                leaf(CstKind::Identifier, "x", 6, 7),
                leaf(CstKind::AssignmentOperator, "=", 8, 9),
                leaf(CstKind::NumberLiteral, "-2", 10, 12),
                leaf(CstKind::SemicolonSeparator, ";", 12, 13),
            ],
        )],
    );

    let mut analyzer = analyzer(source);
    analyzer.analyze(&cst).expect("lowering should succeed");

    let symbol = analyzer.symbol_table().lookup("x").expect("x is defined");
    assert!(symbol
        .types
        .iter()
        .all(|type_| matches!(type_, AstType::Number(size) if size.is_signed())));
    assert_eq!(symbol.types.len(), 4);
}

#[test]
fn bool_suffix_with_a_bool_annotation_passes() {
    let source = "let x?: bool;";
    let cst = program(
        13,
        vec![keyword(
            CstKind::VariableDeclaration,
            "let",
            0,
            13,
            vec![
                leaf(CstKind::Identifier, "x?", 4, 6),
                leaf(CstKind::ColonSeparator, ":", 6, 7),
                leaf(CstKind::Type, "bool", 8, 12),
                leaf(CstKind::SemicolonSeparator, ";", 12, 13),
            ],
        )],
    );

    let mut analyzer = analyzer(source);
    let ast = analyzer.analyze(&cst).expect("lowering should succeed");

    match first_declaration(ast) {
        AstNode::VariableDeclaration(decl) => {
            assert!(decl.mutable);
            assert_eq!(decl.declared_type, Some(AstType::Bool));
        }
        other => panic!("expected a variable declaration, got {other:?}"),
    }
}

#[test]
fn bool_suffix_with_a_numeric_initializer_is_rejected() {
    let source = "const x? = 1;";
    let cst = program(
        13,
        vec![keyword(
            CstKind::VariableDeclaration,
            "const",
            0,
            13,
            vec![
                leaf(CstKind::Identifier, "x?", 6, 8),
                leaf(CstKind::AssignmentOperator, "=", 9, 10),
                leaf(CstKind::NumberLiteral, "1", 11, 12),
                leaf(CstKind::SemicolonSeparator, ";", 12, 13),
            ],
        )],
    );

    let error = analyzer(source).analyze(&cst).expect_err("1 is not bool");
    assert_eq!(error.code, ErrorCode::BoolTypeExpected);
}

#[test]
fn declared_type_must_accept_an_inferred_candidate() {
    let source = "const x: bool = 1;";
    let cst = program(
        18,
        vec![keyword(
            CstKind::VariableDeclaration,
            "const",
            0,
            18,
            vec![
                leaf(CstKind::Identifier, "x", 6, 7),
                leaf(CstKind::ColonSeparator, ":", 7, 8),
                leaf(CstKind::Type, "bool", 9, 13),
                leaf(CstKind::AssignmentOperator, "=", 14, 15),
                leaf(CstKind::NumberLiteral, "1", 16, 17),
                leaf(CstKind::SemicolonSeparator, ";", 17, 18),
            ],
        )],
    );

    let error = analyzer(source)
        .analyze(&cst)
        .expect_err("bool does not accept a number");
    assert_eq!(error.code, ErrorCode::TypeMismatch);
}

#[test]
fn const_without_an_initializer_is_rejected() {
    let source = "const x;";
    let cst = program(
        8,
        vec![keyword(
            CstKind::VariableDeclaration,
            "const",
            0,
            8,
            vec![
                leaf(CstKind::Identifier, "x", 6, 7),
                leaf(CstKind::SemicolonSeparator, ";", 7, 8),
            ],
        )],
    );

    let error = analyzer(source)
        .analyze(&cst)
        .expect_err("a const needs a value");
    assert_eq!(error.code, ErrorCode::MissingAssignmentOperator);
}

#[test]
fn initializer_referencing_an_undefined_name_is_rejected() {
    let source = "const y = x;";
    let cst = program(
        12,
        vec![keyword(
            CstKind::VariableDeclaration,
            "const",
            0,
            12,
            vec![
                leaf(CstKind::Identifier, "y", 6, 7),
                leaf(CstKind::AssignmentOperator, "=", 8, 9),
                leaf(CstKind::Identifier, "x", 10, 11),
                leaf(CstKind::SemicolonSeparator, ";", 11, 12),
            ],
        )],
    );

    let error = analyzer(source).analyze(&cst).expect_err("x is undefined");
    assert_eq!(error.code, ErrorCode::UndefinedIdentifier);
    assert_eq!(error.span, span(10, 11));
}

#[test]
fn bare_identifier_initializer_inherits_the_source_types() {
    let source = "const foo = 1;\nconst bar = foo;";
    let cst = program(
        31,
        vec![
            keyword(
                CstKind::VariableDeclaration,
                "const",
                0,
                14,
                vec![
                    leaf(CstKind::Identifier, "foo", 6, 9),
                    leaf(CstKind::AssignmentOperator, "=", 10, 11),
                    leaf(CstKind::NumberLiteral, "1", 12, 13),
                    leaf(CstKind::SemicolonSeparator, ";", 13, 14),
                ],
            ),
            keyword(
                CstKind::VariableDeclaration,
                "const",
                15,
                31,
                vec![
                    leaf(CstKind::Identifier, "bar", 21, 24),
                    leaf(CstKind::AssignmentOperator, "=", 25, 26),
                    leaf(CstKind::Identifier, "foo", 27, 30),
                    leaf(CstKind::SemicolonSeparator, ";", 30, 31),
                ],
            ),
        ],
    );

    let mut analyzer = analyzer(source);
    analyzer.analyze(&cst).expect("lowering should succeed");

    let bar = analyzer.symbol_table().lookup("bar").expect("bar is defined");
    assert_eq!(bar.types, integer_types());
}

#[test]
fn comparison_initializer_infers_exactly_bool() {
    let source = "const t = 1 == 2;";
    let cst = program(
        17,
        vec![keyword(
            CstKind::VariableDeclaration,
            "const",
            0,
            17,
            vec![
                leaf(CstKind::Identifier, "t", 6, 7),
                leaf(CstKind::AssignmentOperator, "=", 8, 9),
                keyword(
                    CstKind::BinaryExpression,
                    "==",
                    10,
                    16,
                    vec![
                        leaf(CstKind::NumberLiteral, "1", 10, 11),
                        leaf(CstKind::NumberLiteral, "2", 15, 16),
                    ],
                ),
                leaf(CstKind::SemicolonSeparator, ";", 16, 17),
            ],
        )],
    );

    let mut analyzer = analyzer(source);
    analyzer.analyze(&cst).expect("lowering should succeed");

    let symbol = analyzer.symbol_table().lookup("t").expect("t is defined");
    assert_eq!(symbol.types, vec![AstType::Bool]);
}

#[test]
fn expressions_are_rejected_at_the_top_level_outside_inline_mode() {
    let source = "1 + 2";
    let cst = program(
        5,
        vec![keyword(
            CstKind::BinaryExpression,
            "+",
            0,
            5,
            vec![
                leaf(CstKind::NumberLiteral, "1", 0, 1),
                leaf(CstKind::NumberLiteral, "2", 4, 5),
            ],
        )],
    );

    let error = analyzer(source)
        .analyze(&cst)
        .expect_err("expressions are not declarations");
    assert_eq!(error.code, ErrorCode::UnexpectedTopLevelStatement);

    let mut inline = analyzer(source);
    inline.set_inline(true);
    let ast = inline.analyze(&cst).expect("inline mode allows expressions");
    assert!(matches!(
        first_declaration(ast),
        AstNode::BinaryExpression(_)
    ));
}

#[test]
fn regex_literal_is_split_into_pattern_and_flags() {
    let source = "/a+/gi";
    let cst = program(6, vec![leaf(CstKind::RegularExpression, "/a+/gi", 0, 6)]);

    let mut analyzer = analyzer(source);
    analyzer.set_inline(true);
    let ast = analyzer.analyze(&cst).expect("the pattern compiles");

    match first_declaration(ast) {
        AstNode::RegexLiteral(regex) => {
            assert_eq!(regex.pattern, "a+");
            assert_eq!(regex.flags, "gi");
        }
        other => panic!("expected a regex literal, got {other:?}"),
    }
}

#[test]
fn invalid_regex_pattern_is_rejected() {
    let source = "/[/";
    let cst = program(3, vec![leaf(CstKind::RegularExpression, "/[/", 0, 3)]);

    let mut analyzer = analyzer(source);
    analyzer.set_inline(true);
    let error = analyzer.analyze(&cst).expect_err("`[` does not compile");
    assert_eq!(error.code, ErrorCode::InvalidRegularExpression);
}

#[test]
fn unrecognized_regex_flag_is_rejected() {
    let source = "/a/x";
    let cst = program(4, vec![leaf(CstKind::RegularExpression, "/a/x", 0, 4)]);

    let mut analyzer = analyzer(source);
    analyzer.set_inline(true);
    let error = analyzer.analyze(&cst).expect_err("`x` is not a flag");
    assert_eq!(error.code, ErrorCode::InvalidRegularExpression);
}

#[test]
fn function_declaration_scopes_its_parameters() {
    let source = "pub fn double(n: int8) -> int8 { return n; }";
    let cst = program(
        44,
        vec![branch(
            CstKind::FunctionDeclaration,
            0,
            44,
            vec![
                branch(
                    CstKind::ModifiersList,
                    0,
                    3,
                    vec![leaf(CstKind::Modifier, "pub", 0, 3)],
                ),
                leaf(CstKind::Identifier, "double", 7, 13),
                branch(
                    CstKind::ParametersList,
                    13,
                    22,
                    vec![branch(
                        CstKind::Parameter,
                        14,
                        21,
                        vec![
                            leaf(CstKind::Identifier, "n", 14, 15),
                            leaf(CstKind::ColonSeparator, ":", 15, 16),
                            leaf(CstKind::Type, "int8", 17, 21),
                        ],
                    )],
                ),
                branch(
                    CstKind::FunctionReturns,
                    26,
                    30,
                    vec![leaf(CstKind::Type, "int8", 26, 30)],
                ),
                branch(
                    CstKind::BlockStatement,
                    31,
                    44,
                    vec![branch(
                        CstKind::ReturnStatement,
                        33,
                        42,
                        vec![leaf(CstKind::Identifier, "n", 40, 41)],
                    )],
                ),
            ],
        )],
    );

    let mut analyzer = analyzer(source);
    let ast = analyzer.analyze(&cst).expect("lowering should succeed");

    match first_declaration(ast) {
        AstNode::FunctionDeclaration(function) => {
            assert_eq!(function.modifiers.len(), 1);
            assert_eq!(function.params.len(), 1);
            assert_eq!(
                function.params[0].declared_type,
                Some(AstType::Number(NumberSize::Int8))
            );
            assert_eq!(function.return_types, vec![AstType::Number(NumberSize::Int8)]);
            assert_eq!(function.body.statements.len(), 1);
        }
        other => panic!("expected a function declaration, got {other:?}"),
    }

    // the name outlives the body scope, the parameter does not
    let symbol = analyzer
        .symbol_table()
        .lookup("double")
        .expect("double is defined");
    assert_eq!(symbol.kind, SymbolKind::Function);
    assert_eq!(
        symbol.types,
        vec![AstType::Function(FunctionShape {
            params: vec![AstType::Number(NumberSize::Int8)],
            returns: vec![AstType::Number(NumberSize::Int8)],
        })]
    );
    assert!(analyzer.symbol_table().lookup("n").is_err());
}

#[test]
fn type_argument_lists_lower_on_functions_and_calls() {
    let source = "fn first<int8>() {}\nfirst<int8>()";
    let cst = program(
        33,
        vec![
            branch(
                CstKind::FunctionDeclaration,
                0,
                19,
                vec![
                    leaf(CstKind::Identifier, "first", 3, 8),
                    branch(
                        CstKind::TypeArgumentsList,
                        8,
                        14,
                        vec![leaf(CstKind::Type, "int8", 9, 13)],
                    ),
                    branch(CstKind::ParametersList, 14, 16, Vec::new()),
                    branch(CstKind::BlockStatement, 17, 19, Vec::new()),
                ],
            ),
            branch(
                CstKind::CallExpression,
                20,
                33,
                vec![
                    leaf(CstKind::Identifier, "first", 20, 25),
                    branch(
                        CstKind::TypeArgumentsList,
                        25,
                        31,
                        vec![leaf(CstKind::Type, "int8", 26, 30)],
                    ),
                    branch(CstKind::ArgumentsList, 31, 33, Vec::new()),
                ],
            ),
        ],
    );

    let mut analyzer = analyzer(source);
    analyzer.set_inline(true);
    let ast = analyzer.analyze(&cst).expect("lowering should succeed");

    let declarations = match ast {
        AstNode::Program(program) => program.declarations,
        other => panic!("expected a program, got {other:?}"),
    };
    match &declarations[0] {
        AstNode::FunctionDeclaration(function) => {
            assert_eq!(function.type_params, vec![AstType::Number(NumberSize::Int8)]);
        }
        other => panic!("expected a function declaration, got {other:?}"),
    }
    match &declarations[1] {
        AstNode::CallExpression(call) => {
            assert_eq!(call.type_args, vec![AstType::Number(NumberSize::Int8)]);
        }
        other => panic!("expected a call expression, got {other:?}"),
    }
}

#[test]
fn function_without_a_body_is_rejected() {
    let source = "fn broken()";
    let cst = program(
        11,
        vec![branch(
            CstKind::FunctionDeclaration,
            0,
            11,
            vec![
                leaf(CstKind::Identifier, "broken", 3, 9),
                branch(CstKind::ParametersList, 9, 11, Vec::new()),
            ],
        )],
    );

    let error = analyzer(source)
        .analyze(&cst)
        .expect_err("a function needs a body");
    assert_eq!(error.code, ErrorCode::MissingBody);
}

#[test]
fn class_declaration_records_a_named_type() {
    let source = "class Circle extends Shape {}";
    let cst = program(
        29,
        vec![branch(
            CstKind::ClassDeclaration,
            0,
            29,
            vec![
                leaf(CstKind::Identifier, "Circle", 6, 12),
                branch(
                    CstKind::ExtensionsList,
                    21,
                    26,
                    vec![leaf(CstKind::Identifier, "Shape", 21, 26)],
                ),
                branch(CstKind::BlockStatement, 27, 29, Vec::new()),
            ],
        )],
    );

    let mut analyzer = analyzer(source);
    let ast = analyzer.analyze(&cst).expect("lowering should succeed");

    match first_declaration(ast) {
        AstNode::ClassDeclaration(class) => {
            assert_eq!(class.identifier.name, "Circle");
            assert_eq!(class.extends, vec![TypePath::single("Shape")]);
            assert!(class.implements.is_empty());
        }
        other => panic!("expected a class declaration, got {other:?}"),
    }

    let symbol = analyzer
        .symbol_table()
        .lookup("Circle")
        .expect("Circle is defined");
    assert_eq!(symbol.kind, SymbolKind::Class);
    assert_eq!(symbol.types, vec![AstType::Named(TypePath::single("Circle"))]);
}

#[test]
fn import_declaration_binds_the_imported_name() {
    let source = "import io \"std/io\";";
    let cst = program(
        19,
        vec![branch(
            CstKind::ImportDeclaration,
            0,
            19,
            vec![
                leaf(CstKind::Identifier, "io", 7, 9),
                leaf(CstKind::Path, "std/io", 10, 18),
                leaf(CstKind::SemicolonSeparator, ";", 18, 19),
            ],
        )],
    );

    let mut analyzer = analyzer(source);
    analyzer.analyze(&cst).expect("lowering should succeed");

    let symbol = analyzer.symbol_table().lookup("io").expect("io is defined");
    assert_eq!(symbol.kind, SymbolKind::Import);
}

#[test]
fn unknown_modifier_is_rejected() {
    let source = "frozen const x = 1;";
    let cst = program(
        19,
        vec![keyword(
            CstKind::VariableDeclaration,
            "const",
            0,
            19,
            vec![
                branch(
                    CstKind::ModifiersList,
                    0,
                    6,
                    vec![leaf(CstKind::Modifier, "frozen", 0, 6)],
                ),
                leaf(CstKind::Identifier, "x", 13, 14),
                leaf(CstKind::AssignmentOperator, "=", 15, 16),
                leaf(CstKind::NumberLiteral, "1", 17, 18),
                leaf(CstKind::SemicolonSeparator, ";", 18, 19),
            ],
        )],
    );

    let error = analyzer(source)
        .analyze(&cst)
        .expect_err("frozen is not a modifier");
    assert_eq!(error.code, ErrorCode::UnknownModifier);
}

#[test]
fn leftover_declaration_children_are_rejected() {
    let source = "const x = 1 2;";
    let cst = program(
        14,
        vec![keyword(
            CstKind::VariableDeclaration,
            "const",
            0,
            14,
            vec![
                leaf(CstKind::Identifier, "x", 6, 7),
                leaf(CstKind::AssignmentOperator, "=", 8, 9),
                leaf(CstKind::NumberLiteral, "1", 10, 11),
                leaf(CstKind::NumberLiteral, "2", 12, 13),
                leaf(CstKind::SemicolonSeparator, ";", 13, 14),
            ],
        )],
    );

    let error = analyzer(source).analyze(&cst).expect_err("2 is unexpected");
    assert_eq!(error.code, ErrorCode::ExtraNodesFound);
    assert_eq!(error.span, span(12, 13));
}

#[test]
fn when_expression_keeps_its_cases_in_order() {
    let source = "when n { 1 -> true else -> false }";
    let cst = program(
        34,
        vec![
            keyword(
                CstKind::VariableDeclaration,
                "const",
                0,
                0,
                vec![
                    leaf(CstKind::Identifier, "n", 0, 0),
                    leaf(CstKind::AssignmentOperator, "=", 0, 0),
                    leaf(CstKind::NumberLiteral, "1", 0, 0),
                ],
            ),
            branch(
                CstKind::WhenExpression,
                0,
                34,
                vec![
                    leaf(CstKind::Identifier, "n", 5, 6),
                    branch(
                        CstKind::BlockStatement,
                        7,
                        34,
                        vec![
                            branch(
                                CstKind::WhenCase,
                                9,
                                18,
                                vec![
                                    branch(
                                        CstKind::WhenCaseValues,
                                        9,
                                        10,
                                        vec![leaf(CstKind::NumberLiteral, "1", 9, 10)],
                                    ),
                                    branch(
                                        CstKind::WhenCaseConsequent,
                                        14,
                                        18,
                                        vec![leaf(CstKind::BoolLiteral, "true", 14, 18)],
                                    ),
                                ],
                            ),
                            branch(
                                CstKind::WhenCase,
                                19,
                                32,
                                vec![
                                    branch(
                                        CstKind::WhenCaseValues,
                                        19,
                                        23,
                                        vec![leaf(CstKind::Identifier, "else", 19, 23)],
                                    ),
                                    branch(
                                        CstKind::WhenCaseConsequent,
                                        27,
                                        32,
                                        vec![leaf(CstKind::BoolLiteral, "false", 27, 32)],
                                    ),
                                ],
                            ),
                        ],
                    ),
                ],
            ),
        ],
    );

    let mut analyzer = analyzer(source);
    analyzer.set_inline(true);
    let ast = analyzer.analyze(&cst).expect("lowering should succeed");

    let when = match ast {
        AstNode::Program(program) => program.declarations.into_iter().nth(1),
        other => panic!("expected a program, got {other:?}"),
    };
    match when {
        Some(AstNode::WhenExpression(when)) => {
            assert_eq!(when.cases.len(), 2);
            assert_eq!(when.cases[0].values.len(), 1);
            // the catch-all arm is a plain identifier, never resolved
            assert!(matches!(
                when.cases[1].values[0],
                AstNode::Identifier(ref id) if id.name == "else"
            ));
        }
        other => panic!("expected a when expression, got {other:?}"),
    }
}

#[test]
fn lowering_the_same_cst_twice_is_deterministic() {
    let source = "const x = 1;";
    let cst = program(
        12,
        vec![keyword(
            CstKind::VariableDeclaration,
            "const",
            0,
            12,
            vec![
                leaf(CstKind::Identifier, "x", 6, 7),
                leaf(CstKind::AssignmentOperator, "=", 8, 9),
                leaf(CstKind::NumberLiteral, "1", 10, 11),
                leaf(CstKind::SemicolonSeparator, ";", 11, 12),
            ],
        )],
    );

    let first = analyzer(source).analyze(&cst).expect("first pass");
    let second = analyzer(source).analyze(&cst).expect("second pass");
    assert_eq!(first, second);
}
