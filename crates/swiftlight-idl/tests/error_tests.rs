mod common;

use common::*;
use swiftlight_idl::frontend::raw_ast::{CompoundIdentifier, File};
use swiftlight_idl::frontend::types::PrimitiveSubtype;
use swiftlight_idl::{compile_library, CompilerError, ErrorKind};

/// 1ファイルのライブラリをコンパイルし、エラーの種類を返す
fn error_kind(file: File) -> ErrorKind {
    init_logger();
    match compile_library(vec![file]) {
        Ok(library) => panic!("エラーになるはずが {} 件の宣言が解決されました", library.len()),
        Err(err) => {
            assert!(!err.to_string().is_empty());
            err.kind()
        }
    }
}

fn with_struct(members: Vec<(&str, swiftlight_idl::frontend::raw_ast::Type)>) -> FileBuilder {
    FileBuilder::new("example").structure(struct_decl("S", members))
}

#[test]
fn test_empty_library_name() {
    let file = File::new(CompoundIdentifier::new(Vec::new()));
    assert_eq!(error_kind(file), ErrorKind::LibraryNameMismatch);
}

#[test]
fn test_invalid_ordinals() {
    for ordinal in ["0", "abc", "0x100000000", "-3"] {
        let file = FileBuilder::new("example")
            .interface(interface_decl(
                "I",
                vec![method("M", Some(ordinal), Some(params(vec![])), None)],
            ))
            .build();
        assert_eq!(error_kind(file), ErrorKind::InvalidOrdinal, "{}", ordinal);
    }
}

#[test]
fn test_empty_method() {
    let file = FileBuilder::new("example")
        .interface(interface_decl("I", vec![method("M", Some("1"), None, None)]))
        .build();
    assert_eq!(error_kind(file), ErrorKind::EmptyMethod);
}

#[test]
fn test_unknown_identifier() {
    let file = with_struct(vec![("m", named("Missing"))]).build();
    assert_eq!(error_kind(file), ErrorKind::UnknownIdentifier);

    // 他ライブラリの名前は解決しない
    let file = FileBuilder::new("example")
        .structure(struct_decl("Inner", vec![("a", uint8())]))
        .structure(struct_decl("S", vec![("m", named("other.Inner"))]))
        .build();
    assert_eq!(error_kind(file), ErrorKind::UnknownIdentifier);

    // インターフェースのパラメータ内でも検出される
    let file = FileBuilder::new("example")
        .interface(interface_decl(
            "I",
            vec![method("M", Some("1"), Some(params(vec![("x", vector(named("Nope")))])), None)],
        ))
        .build();
    assert_eq!(error_kind(file), ErrorKind::UnknownIdentifier);

    // 定数の型も解決される
    let file = FileBuilder::new("example")
        .constant(const_decl("C", named("Nope"), "1"))
        .build();
    assert_eq!(error_kind(file), ErrorKind::UnknownIdentifier);
}

#[test]
fn test_const_is_not_a_type() {
    let file = with_struct(vec![("m", named("SIZE"))])
        .constant(const_decl("SIZE", uint32(), "4"))
        .build();
    assert_eq!(error_kind(file), ErrorKind::ConstIsNotAType);
}

#[test]
fn test_nullable_enum() {
    let file = with_struct(vec![("m", nullable("Color"))])
        .enumeration(enum_decl("Color", None, &[("RED", "1")]))
        .build();
    assert_eq!(error_kind(file), ErrorKind::NullableEnum);
}

#[test]
fn test_invalid_request_type() {
    let file = with_struct(vec![("r", request("Other"))])
        .structure(struct_decl("Other", vec![("a", uint8())]))
        .build();
    assert_eq!(error_kind(file), ErrorKind::InvalidRequestType);

    let file = with_struct(vec![("r", request("Missing"))]).build();
    assert_eq!(error_kind(file), ErrorKind::InvalidRequestType);
}

#[test]
fn test_invalid_array_size() {
    for count in ["0", "-1", "many"] {
        let file = with_struct(vec![("a", array(uint8(), count))]).build();
        assert_eq!(error_kind(file), ErrorKind::InvalidArraySize, "{}", count);
    }

    // サイズの乗算がオーバーフローする
    let file = with_struct(vec![(
        "a",
        array(array(uint64(), "0x100000000"), "0x100000000"),
    )])
    .build();
    assert_eq!(error_kind(file), ErrorKind::InvalidArraySize);
}

const U64_MAX: &str = "18446744073709551615";

#[test]
fn test_aggregate_size_overflow() {
    // 最大の配列の後ろに揃えが必要なメンバーが続く
    let file = with_struct(vec![("big", array(uint8(), U64_MAX)), ("x", uint16())]).build();
    assert_eq!(error_kind(file), ErrorKind::InvalidArraySize);

    // 2つの大きな配列の合計があふれる
    let half = "0x8000000000000000";
    let file = with_struct(vec![("a", array(uint8(), half)), ("b", array(uint8(), half))]).build();
    assert_eq!(error_kind(file), ErrorKind::InvalidArraySize);

    let file = FileBuilder::new("example")
        .union(union_decl("U", vec![("big", array(uint8(), U64_MAX)), ("w", uint16())]))
        .build();
    assert_eq!(error_kind(file), ErrorKind::InvalidArraySize);

    let file = FileBuilder::new("example")
        .interface(interface_decl(
            "I",
            vec![method(
                "M",
                Some("1"),
                Some(params(vec![("big", array(uint8(), U64_MAX)), ("x", uint16())])),
                None,
            )],
        ))
        .build();
    assert_eq!(error_kind(file), ErrorKind::InvalidArraySize);
}

#[test]
fn test_size_overflow_names_the_declaration() {
    let mut decl = struct_decl("Huge", vec![("big", array(uint8(), U64_MAX)), ("x", uint16())]);
    decl.identifier.location = at(7);
    let file = FileBuilder::new("example").structure(decl).build();

    match compile_library(vec![file]).unwrap_err() {
        CompilerError::TypeShapeOverflow { owner, location } => {
            assert_eq!(owner, "Huge");
            assert_eq!(location, at(7));
        }
        other => panic!("予期しないエラー: {:?}", other),
    }
}

#[test]
fn test_largest_array_alone_still_fits() {
    let file = with_struct(vec![("big", array(uint8(), U64_MAX))]).build();
    let library = compile_library(vec![file]).expect("コンパイルエラー");
    assert_eq!(
        struct_of(&library, "S").typeshape,
        Some(swiftlight_idl::TypeShape::new(u64::MAX, 1))
    );
}

#[test]
fn test_invalid_bound() {
    let file = with_struct(vec![("s", bounded_string("0"))]).build();
    assert_eq!(error_kind(file), ErrorKind::InvalidBound);

    let file = with_struct(vec![("v", bounded_vector(uint8(), "-5"))]).build();
    assert_eq!(error_kind(file), ErrorKind::InvalidBound);
}

#[test]
fn test_invalid_enum_subtype() {
    for subtype in [
        PrimitiveSubtype::Bool,
        PrimitiveSubtype::Status,
        PrimitiveSubtype::Float32,
        PrimitiveSubtype::Float64,
    ] {
        let file = FileBuilder::new("example")
            .enumeration(enum_decl("E", Some(subtype), &[]))
            .build();
        assert_eq!(error_kind(file), ErrorKind::InvalidEnumSubtype, "{}", subtype);
    }
}

#[test]
fn test_invalid_enum_value() {
    let file = FileBuilder::new("example")
        .enumeration(enum_decl("E", Some(PrimitiveSubtype::Uint8), &[("A", "-1")]))
        .build();
    assert_eq!(error_kind(file), ErrorKind::InvalidEnumValue);

    let file = FileBuilder::new("example")
        .enumeration(enum_decl("E", Some(PrimitiveSubtype::Int16), &[("A", "40000")]))
        .build();
    assert_eq!(error_kind(file), ErrorKind::InvalidEnumValue);
}

#[test]
fn test_duplicate_method_name() {
    let file = FileBuilder::new("example")
        .interface(interface_decl(
            "I",
            vec![
                method("M", Some("1"), Some(params(vec![])), None),
                method("M", Some("2"), Some(params(vec![])), None),
            ],
        ))
        .build();
    assert_eq!(error_kind(file), ErrorKind::DuplicateMethodName);
}

#[test]
fn test_duplicate_method_ordinal() {
    let file = FileBuilder::new("example")
        .interface(interface_decl(
            "I",
            vec![
                method("A", Some("5"), Some(params(vec![])), None),
                method("B", Some("0x5"), Some(params(vec![])), None),
            ],
        ))
        .build();
    assert_eq!(error_kind(file), ErrorKind::DuplicateMethodOrdinal);
}

#[test]
fn test_duplicate_member_names() {
    let file = with_struct(vec![("a", uint8()), ("a", uint16())]).build();
    assert_eq!(error_kind(file), ErrorKind::DuplicateMemberName);

    let file = FileBuilder::new("example")
        .union(union_decl("U", vec![("x", uint8()), ("x", uint64())]))
        .build();
    assert_eq!(error_kind(file), ErrorKind::DuplicateMemberName);

    let file = FileBuilder::new("example")
        .enumeration(enum_decl("E", None, &[("A", "1"), ("A", "2")]))
        .build();
    assert_eq!(error_kind(file), ErrorKind::DuplicateMemberName);

    let file = FileBuilder::new("example")
        .interface(interface_decl(
            "I",
            vec![method(
                "M",
                Some("1"),
                Some(params(vec![("p", uint8()), ("p", uint8())])),
                None,
            )],
        ))
        .build();
    assert_eq!(error_kind(file), ErrorKind::DuplicateMemberName);
}

#[test]
fn test_error_reports_location() {
    let mut member = struct_decl("S", vec![("m", named("Missing"))]);
    if let swiftlight_idl::frontend::raw_ast::Type::Identifier { identifier, .. } =
        &mut member.members[0].type_ctor
    {
        identifier.components[0].location = at(42);
    }
    let file = FileBuilder::new("example").structure(member).build();

    let err = compile_library(vec![file]).unwrap_err();
    assert_eq!(err.location(), Some(at(42)));
    assert!(err.to_string().contains("Missing"));
}
