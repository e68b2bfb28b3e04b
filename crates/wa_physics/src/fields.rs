// crates/wa_physics/src/fields.rs

//! 物理场与字段注册表
//!
//! - [`VolField`]: 体心场，存储单元内部值与每个 patch 的边界面值
//! - [`SurfaceScalarField`]: 面心标量场（通量、面混合因子）
//! - [`FieldDb`]: 按名称注册的体心场集合，支持标量和向量两种类型
//!
//! 字段名必须以字母开头，只包含字母、数字和下划线（如 `U`、`Rnu`、`nut`）。
//!
//! # 示例
//!
//! ```
//! use glam::DVec3;
//! use wa_physics::fields::{FieldDb, VolField};
//! use wa_physics::mesh::{FvMesh, PatchKind};
//!
//! let mesh = FvMesh::cartesian_box([2, 2, 1], DVec3::ONE, [PatchKind::Patch; 6]).unwrap();
//! let mut db = FieldDb::new();
//! db.insert(VolField::uniform("U", &mesh, DVec3::X)).unwrap();
//! assert!(db.get::<DVec3>("U").is_ok());
//! assert!(db.get::<f64>("U").is_err());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, Mul, Sub};

use glam::DVec3;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use wa_config::ConfigError;
use wa_foundation::{WaError, WaResult};

use crate::mesh::FvMesh;

// ============================================================
// 字段类型
// ============================================================

/// 字段值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// 标量场
    Scalar,
    /// 三维向量场
    Vector,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::Vector => write!(f, "vector"),
        }
    }
}

/// 字段注册表错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// 无效字段名
    #[error("无效字段名 '{0}': 必须以字母开头, 只含字母、数字和下划线")]
    InvalidName(String),

    /// 字段不存在
    #[error("字段 '{0}' 不存在")]
    NotFound(String),

    /// 字段类型不匹配
    #[error("字段 '{name}' 类型不匹配: 期望 {expected}, 实际 {actual}")]
    TypeMismatch {
        /// 字段名
        name: String,
        /// 期望类型
        expected: FieldType,
        /// 实际类型
        actual: FieldType,
    },
}

/// 验证字段名
fn is_valid_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

// ============================================================
// 字段值 trait
// ============================================================

/// 可存入体心场的值类型（`f64` 或 `DVec3`）
pub trait FieldValue:
    Copy
    + fmt::Debug
    + Default
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + 'static
{
    /// 对应的字段类型
    const FIELD_TYPE: FieldType;

    /// 零值
    fn zero() -> Self {
        Self::default()
    }

    /// 模长
    fn mag(&self) -> f64;

    /// 从单个 JSON 值解析（标量为数值，向量为三元数组）
    fn from_json(value: &Value) -> Option<Self>;

    /// 序列化为 JSON 值
    fn to_json(&self) -> Value;

    /// 从注册表按类型取出场
    fn lookup<'a>(db: &'a FieldDb, name: &str) -> Result<&'a VolField<Self>, FieldError>;

    /// 包装为注册表条目
    fn into_entry(field: VolField<Self>) -> FieldEntry;
}

impl FieldValue for f64 {
    const FIELD_TYPE: FieldType = FieldType::Scalar;

    #[inline]
    fn mag(&self) -> f64 {
        self.abs()
    }

    fn from_json(value: &Value) -> Option<Self> {
        value.as_f64().filter(|v| v.is_finite())
    }

    fn to_json(&self) -> Value {
        Value::from(*self)
    }

    fn lookup<'a>(db: &'a FieldDb, name: &str) -> Result<&'a VolField<Self>, FieldError> {
        match db.entry(name)? {
            FieldEntry::Scalar(field) => Ok(field),
            other => Err(db.mismatch(name, Self::FIELD_TYPE, other)),
        }
    }

    fn into_entry(field: VolField<Self>) -> FieldEntry {
        FieldEntry::Scalar(field)
    }
}

impl FieldValue for DVec3 {
    const FIELD_TYPE: FieldType = FieldType::Vector;

    #[inline]
    fn mag(&self) -> f64 {
        self.length()
    }

    fn from_json(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        if items.len() != 3 {
            return None;
        }
        let x = f64::from_json(&items[0])?;
        let y = f64::from_json(&items[1])?;
        let z = f64::from_json(&items[2])?;
        Some(DVec3::new(x, y, z))
    }

    fn to_json(&self) -> Value {
        Value::from(vec![self.x, self.y, self.z])
    }

    fn lookup<'a>(db: &'a FieldDb, name: &str) -> Result<&'a VolField<Self>, FieldError> {
        match db.entry(name)? {
            FieldEntry::Vector(field) => Ok(field),
            other => Err(db.mismatch(name, Self::FIELD_TYPE, other)),
        }
    }

    fn into_entry(field: VolField<Self>) -> FieldEntry {
        FieldEntry::Vector(field)
    }
}

/// 解析 patch 面值列表
///
/// 单个值表示均匀分布，列表表示逐面给定（长度必须等于面数）。
pub fn parse_patch_values<T: FieldValue>(
    key: &str,
    value: &Value,
    n_faces: usize,
) -> Result<Vec<T>, ConfigError> {
    if let Some(uniform) = T::from_json(value) {
        return Ok(vec![uniform; n_faces]);
    }
    let items = value
        .as_array()
        .ok_or_else(|| ConfigError::invalid(key, value, "期望均匀值或逐面列表"))?;
    if items.len() != n_faces {
        return Err(ConfigError::invalid(
            key,
            items.len(),
            format!("列表长度必须等于 patch 面数 {n_faces}"),
        ));
    }
    items
        .iter()
        .map(|item| T::from_json(item).ok_or_else(|| ConfigError::invalid(key, item, "无效的面值")))
        .collect()
}

/// 序列化 patch 面值：全部相等时写为单个值
pub fn patch_values_to_json<T: FieldValue>(values: &[T]) -> Value {
    match values.first() {
        Some(first) if values.iter().all(|v| v == first) => first.to_json(),
        None => T::zero().to_json(),
        _ => Value::Array(values.iter().map(FieldValue::to_json).collect()),
    }
}

// ============================================================
// 体心场
// ============================================================

/// 体心场：单元内部值 + 各 patch 边界面值
#[derive(Debug, Clone, PartialEq)]
pub struct VolField<T: FieldValue> {
    name: String,
    internal: Vec<T>,
    boundary: Vec<Vec<T>>,
}

impl<T: FieldValue> VolField<T> {
    /// 均匀场
    pub fn uniform(name: impl Into<String>, mesh: &FvMesh, value: T) -> Self {
        Self {
            name: name.into(),
            internal: vec![value; mesh.n_cells()],
            boundary: mesh.patches().iter().map(|p| vec![value; p.size]).collect(),
        }
    }

    /// 由内部值构造，边界面值取相邻单元值
    pub fn from_internal(name: impl Into<String>, mesh: &FvMesh, internal: Vec<T>) -> WaResult<Self> {
        let name = name.into();
        if internal.len() != mesh.n_cells() {
            return Err(WaError::size_mismatch("internal field", mesh.n_cells(), internal.len()));
        }
        let boundary = (0..mesh.n_patches())
            .map(|p| mesh.patch_face_cells(p).iter().map(|&c| internal[c]).collect())
            .collect();
        Ok(Self {
            name,
            internal,
            boundary,
        })
    }

    /// 改名
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 字段名
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// patch 数
    #[inline]
    pub fn n_patches(&self) -> usize {
        self.boundary.len()
    }

    /// 单元数
    #[inline]
    pub fn len(&self) -> usize {
        self.internal.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.internal.is_empty()
    }

    /// 内部值
    #[inline]
    pub fn internal(&self) -> &[T] {
        &self.internal
    }

    /// 可变内部值
    #[inline]
    pub fn internal_mut(&mut self) -> &mut [T] {
        &mut self.internal
    }

    /// 单元值
    #[inline]
    pub fn get(&self, cell: usize) -> T {
        self.internal[cell]
    }

    /// patch 边界面值
    #[inline]
    pub fn boundary(&self, patch: usize) -> &[T] {
        &self.boundary[patch]
    }

    /// 可变 patch 边界面值
    #[inline]
    pub fn boundary_mut(&mut self, patch: usize) -> &mut [T] {
        &mut self.boundary[patch]
    }

    /// 设置全部值为同一值
    pub fn fill(&mut self, value: T) {
        self.internal.fill(value);
        for patch in &mut self.boundary {
            patch.fill(value);
        }
    }

    /// 边界面值取相邻单元值（零梯度外推）
    pub fn correct_boundary_from_owner(&mut self, mesh: &FvMesh) {
        for (p, values) in self.boundary.iter_mut().enumerate() {
            for (v, &cell) in values.iter_mut().zip(mesh.patch_face_cells(p)) {
                *v = self.internal[cell];
            }
        }
    }

    /// 面值：内部面线性插值，边界面取边界值
    pub fn face_value(&self, mesh: &FvMesh, face: usize) -> T {
        let own = mesh.face_owner(face);
        match mesh.face_neighbour(face) {
            Some(nei) => {
                let w = mesh.interpolation_weight(face);
                self.internal[own] * w + self.internal[nei] * (1.0 - w)
            }
            None => match mesh.which_patch(face) {
                Some((patch, local)) => self.boundary[patch][local],
                None => self.internal[own],
            },
        }
    }

    /// 检查与网格尺寸一致
    pub fn check_mesh(&self, mesh: &FvMesh) -> WaResult<()> {
        if self.internal.len() != mesh.n_cells() {
            return Err(WaError::size_mismatch("internal field", mesh.n_cells(), self.internal.len()));
        }
        if self.boundary.len() != mesh.n_patches() {
            return Err(WaError::size_mismatch("boundary patches", mesh.n_patches(), self.boundary.len()));
        }
        for (p, values) in self.boundary.iter().enumerate() {
            if values.len() != mesh.patch(p).size {
                return Err(WaError::size_mismatch("patch faces", mesh.patch(p).size, values.len()));
            }
        }
        Ok(())
    }
}

impl VolField<f64> {
    /// 内部值最小值
    pub fn min(&self) -> f64 {
        self.internal.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// 内部值最大值
    pub fn max(&self) -> f64 {
        self.internal.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

// ============================================================
// 面心场
// ============================================================

/// 面心标量场（每个面一个值）
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceScalarField {
    name: String,
    values: Vec<f64>,
}

impl SurfaceScalarField {
    /// 均匀面场
    pub fn uniform(name: impl Into<String>, mesh: &FvMesh, value: f64) -> Self {
        Self {
            name: name.into(),
            values: vec![value; mesh.n_faces()],
        }
    }

    /// 由逐面值构造
    pub fn from_values(name: impl Into<String>, mesh: &FvMesh, values: Vec<f64>) -> WaResult<Self> {
        if values.len() != mesh.n_faces() {
            return Err(WaError::size_mismatch("surface field", mesh.n_faces(), values.len()));
        }
        Ok(Self {
            name: name.into(),
            values,
        })
    }

    /// 由速度场构造体积通量 φ = U_f · S_f
    pub fn flux(name: impl Into<String>, mesh: &FvMesh, u: &VolField<DVec3>) -> Self {
        let values = (0..mesh.n_faces())
            .map(|f| u.face_value(mesh, f).dot(mesh.face_area_vector(f)))
            .collect();
        Self {
            name: name.into(),
            values,
        }
    }

    /// 字段名
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 面值
    #[inline]
    pub fn value(&self, face: usize) -> f64 {
        self.values[face]
    }

    /// 全部面值
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// 可变面值
    #[inline]
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }
}

// ============================================================
// 字段注册表
// ============================================================

/// 注册表条目
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEntry {
    /// 标量场
    Scalar(VolField<f64>),
    /// 向量场
    Vector(VolField<DVec3>),
}

impl FieldEntry {
    /// 条目类型
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Scalar(_) => FieldType::Scalar,
            Self::Vector(_) => FieldType::Vector,
        }
    }
}

/// 同一区域内的体心场注册表
#[derive(Debug, Clone, Default)]
pub struct FieldDb {
    fields: HashMap<String, FieldEntry>,
}

impl FieldDb {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册（或替换）字段
    pub fn insert<T: FieldValue>(&mut self, field: VolField<T>) -> Result<(), FieldError> {
        let name = field.name().to_string();
        if !is_valid_field_name(&name) {
            return Err(FieldError::InvalidName(name));
        }
        if self.fields.insert(name.clone(), T::into_entry(field)).is_some() {
            log::trace!("替换字段 '{name}'");
        }
        Ok(())
    }

    /// 按类型取字段
    pub fn get<T: FieldValue>(&self, name: &str) -> Result<&VolField<T>, FieldError> {
        T::lookup(self, name)
    }

    /// 取标量场
    pub fn scalar(&self, name: &str) -> Result<&VolField<f64>, FieldError> {
        self.get::<f64>(name)
    }

    /// 取向量场
    pub fn vector(&self, name: &str) -> Result<&VolField<DVec3>, FieldError> {
        self.get::<DVec3>(name)
    }

    /// 可变标量场
    pub fn scalar_mut(&mut self, name: &str) -> Result<&mut VolField<f64>, FieldError> {
        match self.fields.get_mut(name) {
            Some(FieldEntry::Scalar(field)) => Ok(field),
            Some(other) => Err(FieldError::TypeMismatch {
                name: name.to_string(),
                expected: FieldType::Scalar,
                actual: other.field_type(),
            }),
            None => Err(FieldError::NotFound(name.to_string())),
        }
    }

    /// 可变向量场
    pub fn vector_mut(&mut self, name: &str) -> Result<&mut VolField<DVec3>, FieldError> {
        match self.fields.get_mut(name) {
            Some(FieldEntry::Vector(field)) => Ok(field),
            Some(other) => Err(FieldError::TypeMismatch {
                name: name.to_string(),
                expected: FieldType::Vector,
                actual: other.field_type(),
            }),
            None => Err(FieldError::NotFound(name.to_string())),
        }
    }

    /// 字段类型
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).map(FieldEntry::field_type)
    }

    /// 是否包含字段
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// 移除字段
    pub fn remove(&mut self, name: &str) -> Option<FieldEntry> {
        self.fields.remove(name)
    }

    /// 字段名（排序）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// 字段数
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn entry(&self, name: &str) -> Result<&FieldEntry, FieldError> {
        self.fields
            .get(name)
            .ok_or_else(|| FieldError::NotFound(name.to_string()))
    }

    fn mismatch(&self, name: &str, expected: FieldType, actual: &FieldEntry) -> FieldError {
        FieldError::TypeMismatch {
            name: name.to_string(),
            expected,
            actual: actual.field_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::PatchKind;

    fn mesh() -> FvMesh {
        FvMesh::cartesian_box([3, 2, 1], DVec3::ONE, [PatchKind::Patch; 6]).unwrap()
    }

    #[test]
    fn test_field_names() {
        assert!(is_valid_field_name("U"));
        assert!(is_valid_field_name("Rnu"));
        assert!(is_valid_field_name("nut_wall2"));
        assert!(!is_valid_field_name(""));
        assert!(!is_valid_field_name("_x"));
        assert!(!is_valid_field_name("1a"));
        assert!(!is_valid_field_name("a-b"));
    }

    #[test]
    fn test_registry_types() {
        let mesh = mesh();
        let mut db = FieldDb::new();
        db.insert(VolField::uniform("p", &mesh, 1.0)).unwrap();
        db.insert(VolField::uniform("U", &mesh, DVec3::X)).unwrap();

        assert_eq!(db.field_type("p"), Some(FieldType::Scalar));
        assert!(db.scalar("p").is_ok());
        assert!(matches!(
            db.scalar("U"),
            Err(FieldError::TypeMismatch { expected: FieldType::Scalar, actual: FieldType::Vector, .. })
        ));
        assert!(matches!(db.vector("missing"), Err(FieldError::NotFound(_))));
        assert_eq!(db.names(), vec!["U", "p"]);
    }

    #[test]
    fn test_invalid_name_rejected() {
        let mesh = mesh();
        let mut db = FieldDb::new();
        let result = db.insert(VolField::uniform("bad name", &mesh, 0.0));
        assert!(matches!(result, Err(FieldError::InvalidName(_))));
    }

    #[test]
    fn test_from_internal_sets_boundary() {
        let mesh = mesh();
        let values: Vec<f64> = (0..mesh.n_cells()).map(|c| c as f64).collect();
        let field = VolField::from_internal("T", &mesh, values).unwrap();
        let xmax = mesh.patch_index("xMax").unwrap();
        let cells = mesh.patch_face_cells(xmax);
        for (v, &c) in field.boundary(xmax).iter().zip(cells) {
            assert_eq!(*v, c as f64);
        }
        assert!(field.check_mesh(&mesh).is_ok());
    }

    #[test]
    fn test_face_value_interpolation() {
        let mesh = mesh();
        let values: Vec<f64> = (0..mesh.n_cells()).map(|c| c as f64).collect();
        let field = VolField::from_internal("T", &mesh, values).unwrap();
        // 面 0: 单元 0 与 1 之间，均匀网格权重 0.5
        assert!((field.face_value(&mesh, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_flux_of_uniform_velocity() {
        let mesh = mesh();
        let u = VolField::uniform("U", &mesh, DVec3::new(2.0, 0.0, 0.0));
        let phi = SurfaceScalarField::flux("phi", &mesh, &u);
        let area = mesh.face_area(0);
        assert!((phi.value(0) - 2.0 * area).abs() < 1e-12);
    }

    #[test]
    fn test_patch_values_json() {
        let uniform = parse_patch_values::<f64>("gradient", &Value::from(1.5), 3).unwrap();
        assert_eq!(uniform, vec![1.5; 3]);
        assert_eq!(patch_values_to_json(&uniform), Value::from(1.5));

        let listed = serde_json::json!([1.0, 2.0]);
        let values = parse_patch_values::<f64>("gradient", &listed, 2).unwrap();
        assert_eq!(patch_values_to_json(&values), listed);
        assert!(parse_patch_values::<f64>("gradient", &listed, 3).is_err());

        let vector = serde_json::json!([0.0, 1.0, 0.0]);
        let v = parse_patch_values::<DVec3>("gradient", &vector, 2).unwrap();
        assert_eq!(v, vec![DVec3::Y; 2]);
    }
}
