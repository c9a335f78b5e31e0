//! # 型の形状とレイアウト計算
//!
//! 型のサイズとアラインメント（[`TypeShape`]）、集約内でのメンバー配置
//! （[`FieldShape`]）を定義し、構造体・共用体・配列・vector・string の
//! レイアウト規則を実装します。
//!
//! 構造体は宣言順に逐次配置し、末尾パディングは付けません（C構造体と同じく、
//! 外側の集約が次のメンバーを配置するときに `align_to` で揃えます）。

use serde::Serialize;

use crate::frontend::types::PrimitiveSubtype;

/// 型のサイズとアラインメント
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TypeShape {
    size: u64,
    alignment: u64,
}

impl TypeShape {
    /// 新しい形状を作成
    ///
    /// アラインメントは1以上の2のべき乗でなければなりません。
    pub const fn new(size: u64, alignment: u64) -> Self {
        debug_assert!(alignment.is_power_of_two());
        Self { size, alignment }
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn alignment(&self) -> u64 {
        self.alignment
    }
}

/// 集約内のメンバー1つ分の形状と配置オフセット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FieldShape {
    #[serde(flatten)]
    typeshape: TypeShape,
    offset: u64,
}

impl FieldShape {
    pub fn new(typeshape: TypeShape, offset: u64) -> Self {
        Self { typeshape, offset }
    }

    pub fn typeshape(&self) -> TypeShape {
        self.typeshape
    }

    pub fn size(&self) -> u64 {
        self.typeshape.size
    }

    pub fn alignment(&self) -> u64 {
        self.typeshape.alignment
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }
}

pub const HANDLE_TYPESHAPE: TypeShape = TypeShape::new(4, 4);
pub const POINTER_TYPESHAPE: TypeShape = TypeShape::new(8, 8);
pub const UINT32_TYPESHAPE: TypeShape = TypeShape::new(4, 4);
pub const UINT64_TYPESHAPE: TypeShape = TypeShape::new(8, 8);

/// 値を指定されたアラインメントに合わせる（オーバーフロー時は `None`）
pub fn align_to(size: u64, alignment: u64) -> Option<u64> {
    debug_assert!(alignment.is_power_of_two(), "アラインメントは2のべき乗である必要があります");
    let mask = alignment - 1;
    size.checked_add(mask).map(|padded| padded & !mask)
}

/// プリミティブ型の形状（サイズ = アラインメント）
pub fn primitive_typeshape(subtype: PrimitiveSubtype) -> TypeShape {
    match subtype {
        PrimitiveSubtype::Int8 | PrimitiveSubtype::Uint8 | PrimitiveSubtype::Bool => {
            TypeShape::new(1, 1)
        }
        PrimitiveSubtype::Int16 | PrimitiveSubtype::Uint16 => TypeShape::new(2, 2),
        PrimitiveSubtype::Int32
        | PrimitiveSubtype::Uint32
        | PrimitiveSubtype::Status
        | PrimitiveSubtype::Float32 => TypeShape::new(4, 4),
        PrimitiveSubtype::Int64 | PrimitiveSubtype::Uint64 | PrimitiveSubtype::Float64 => {
            TypeShape::new(8, 8)
        }
    }
}

/// 構造体型のレイアウトを計算
///
/// 各メンバーを宣言順に、そのアラインメントに揃えたオフセットへ配置します。
/// 戻り値は集約の形状と、入力と同じ順序のメンバー配置です。
/// サイズが `u64` に収まらない場合は `None` を返します。
pub fn struct_typeshape(members: &[TypeShape]) -> Option<(TypeShape, Vec<FieldShape>)> {
    let mut size = 0u64;
    let mut alignment = 1u64;
    let mut fields = Vec::with_capacity(members.len());

    for member in members {
        let offset = align_to(size, member.alignment)?;
        alignment = alignment.max(member.alignment);
        size = offset.checked_add(member.size)?;
        fields.push(FieldShape::new(*member, offset));
    }

    Some((TypeShape::new(size, alignment), fields))
}

/// 共用体本体（タグを除く格納領域）の形状
///
/// 共用体本体は1つの不透明なフィールドとして扱われるため、
/// 構造体と違ってサイズを自身のアラインメントに切り上げます。
pub fn union_body_typeshape(members: &[TypeShape]) -> Option<TypeShape> {
    let mut size = 0u64;
    let mut alignment = 1u64;
    for member in members {
        size = size.max(member.size);
        alignment = alignment.max(member.alignment);
    }
    Some(TypeShape::new(align_to(size, alignment)?, alignment))
}

/// タグ付き共用体のレイアウトを計算
///
/// `{ tag: uint32, body }` という2フィールドの構造体として配置し、
/// すべてのメンバーに本体の開始オフセットを割り当てます。
pub fn union_typeshape(members: &[TypeShape]) -> Option<(TypeShape, Vec<FieldShape>)> {
    let body = union_body_typeshape(members)?;
    let (typeshape, header) = struct_typeshape(&[UINT32_TYPESHAPE, body])?;
    let body_offset = header[1].offset();

    let fields = members
        .iter()
        .map(|member| FieldShape::new(*member, body_offset))
        .collect();

    Some((typeshape, fields))
}

/// 配列型の形状（要素数によるサイズの乗算。オーバーフロー時は `None`）
pub fn array_typeshape(element: TypeShape, count: u64) -> Option<TypeShape> {
    let size = element.size.checked_mul(count)?;
    Some(TypeShape::new(size, element.alignment))
}

/// vector のヘッダ形状（長さ uint64 + データポインタ）
pub fn vector_typeshape() -> TypeShape {
    TypeShape::new(
        UINT64_TYPESHAPE.size + POINTER_TYPESHAPE.size,
        POINTER_TYPESHAPE.alignment,
    )
}

/// string のヘッダ形状（vector と同じ）
pub fn string_typeshape() -> TypeShape {
    vector_typeshape()
}
