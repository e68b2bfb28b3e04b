// crates/wa_physics/tests/field_gradient_boundary.rs

//! fieldBasedGradient 边界条件测试
//! 验证配置往返、梯度更新，以及作为 Rnu 边界时在 correct() 中的行为

use glam::DVec3;
use wa_config::Dictionary;
use wa_physics::boundary::{field_gradient, FieldGradientBoundary, ScalarBoundaryCondition};
use wa_physics::fields::{FieldDb, SurfaceScalarField, VolField};
use wa_physics::mesh::{FvMesh, PatchKind, WallDistance};
use wa_physics::turbulence::{ClosureKind, FlowInputs, ModelBuilder};

fn mesh() -> FvMesh {
    let kinds = [
        PatchKind::Patch,
        PatchKind::Patch,
        PatchKind::Wall,
        PatchKind::Wall,
        PatchKind::Symmetry,
        PatchKind::Symmetry,
    ];
    FvMesh::cartesian_box([4, 3, 2], DVec3::new(2.0, 1.0, 0.5), kinds).unwrap()
}

/// 测试 {field = "U", gradCoeff = 2.0} 写出后重建不变
#[test]
fn test_configuration_round_trip() {
    let mesh = mesh();
    let ymin = mesh.patch_index("yMin").unwrap();
    let u = VolField::uniform("U", &mesh, DVec3::ZERO);
    let bc = FieldGradientBoundary::new(&mesh, ymin, &u).with_source("U", 2.0);

    let text = bc.write().to_json_string_pretty().unwrap();
    let dict = Dictionary::from_json_str(&text).unwrap();
    assert_eq!(dict.get_word("type").unwrap(), field_gradient::TYPE_NAME);

    let back = FieldGradientBoundary::from_dict(&mesh, ymin, &u, &dict).unwrap();
    assert_eq!(back.field_name(), "U");
    assert_eq!(back.grad_coeff(), 2.0);
    assert_eq!(back.sn_grad(), bc.sn_grad());
}

/// 测试 U = 1、gradCoeff = 2 时 patch 每个面的梯度均为 2
#[test]
fn test_uniform_source_sets_uniform_gradient() {
    let mesh = mesh();
    let xmax = mesh.patch_index("xMax").unwrap();
    let mut db = FieldDb::new();
    db.insert(VolField::uniform("U", &mesh, 1.0)).unwrap();

    let t = VolField::uniform("T", &mesh, 0.0);
    let mut bc = FieldGradientBoundary::new(&mesh, xmax, &t).with_source("U", 2.0);
    bc.update_coeffs(&db, &mesh).unwrap();
    assert_eq!(bc.sn_grad().len(), mesh.patch(xmax).size);
    assert!(bc.sn_grad().iter().all(|&g| (g - 2.0).abs() < 1e-15));

    // 其他 patch 不受影响
    let xmin = mesh.patch_index("xMin").unwrap();
    let other = FieldGradientBoundary::new(&mesh, xmin, &t);
    assert!(other.sn_grad().iter().all(|&g| g == 0.0));
}

/// 测试向量场：梯度按分量缩放，面值 x_c + g/δ
#[test]
fn test_vector_source_and_evaluate() {
    let mesh = mesh();
    let ymax = mesh.patch_index("yMax").unwrap();
    let mut db = FieldDb::new();
    db.insert(VolField::uniform("U", &mesh, DVec3::ONE)).unwrap();

    let mut v = VolField::uniform("V", &mesh, DVec3::new(1.0, 0.0, 0.0));
    let mut bc = FieldGradientBoundary::new(&mesh, ymax, &v).with_source("U", 2.0);
    bc.update_coeffs(&db, &mesh).unwrap();
    assert!(bc.sn_grad().iter().all(|&g| g == DVec3::splat(2.0)));

    bc.evaluate(&mesh, &mut v);
    let deltas = mesh.patch_delta_coeffs(ymax);
    for (value, delta) in v.boundary(ymax).iter().zip(&deltas) {
        let expected = DVec3::new(1.0, 0.0, 0.0) + DVec3::splat(2.0) / *delta;
        assert!((*value - expected).length() < 1e-12);
    }
}

/// 测试作为 Rnu 壁面边界时，每步从注册表取源字段更新梯度
#[test]
fn test_rnu_boundary_inside_model() {
    let mesh = mesh();
    let wd = WallDistance::compute(&mesh);
    let ymin = mesh.patch_index("yMin").unwrap();
    let boundary = Dictionary::from_json_str(
        r#"{ "yMin": { "type": "fieldBasedGradient", "gradient": 0, "field": "ks", "gradCoeff": 2.0 } }"#,
    )
    .unwrap();
    let mut model = ModelBuilder::new(&mesh, &wd)
        .kind(ClosureKind::WrayAgarwal2017)
        .initial_rnu(1e-3)
        .rnu_boundary(boundary)
        .build()
        .unwrap();

    let u = VolField::uniform("U", &mesh, DVec3::new(0.5, 0.0, 0.0));
    let phi = SurfaceScalarField::flux("phi", &mesh, &u);
    let mut db = FieldDb::new();
    db.insert(u).unwrap();
    db.insert(VolField::uniform("ks", &mesh, 1e-3)).unwrap();

    model.correct(&FlowInputs::new(&db, &phi, 1e-5, 0.01)).unwrap();

    let Some(ScalarBoundaryCondition::FieldBasedGradient(bc)) = model.rnu_boundary().get(ymin) else {
        panic!("yMin 应为 fieldBasedGradient");
    };
    assert!(bc.sn_grad().iter().all(|&g| (g - 2e-3).abs() < 1e-15));

    let deltas = mesh.patch_delta_coeffs(ymin);
    let cells = mesh.patch_face_cells(ymin);
    for ((value, delta), &cell) in model.rnu().boundary(ymin).iter().zip(&deltas).zip(cells) {
        let expected = model.rnu().get(cell) + 2e-3 / delta;
        assert!((value - expected).abs() < 1e-12);
    }

    // 写出后 patch 配置保持
    let written = model.rnu_boundary().write(&mesh).sub_dict("yMin").unwrap();
    assert_eq!(written.get_word("field").unwrap(), "ks");
    assert_eq!(written.get_scalar("gradCoeff").unwrap(), 2.0);
}

/// 测试源字段缺失时 correct() 返回错误
#[test]
fn test_missing_source_surfaces_error() {
    let mesh = mesh();
    let wd = WallDistance::compute(&mesh);
    let boundary = Dictionary::from_json_str(
        r#"{ "yMax": { "type": "fieldBasedGradient", "gradient": 0, "field": "ks", "gradCoeff": 1.0 } }"#,
    )
    .unwrap();
    let mut model = ModelBuilder::new(&mesh, &wd).rnu_boundary(boundary).build().unwrap();

    let u = VolField::uniform("U", &mesh, DVec3::X);
    let phi = SurfaceScalarField::flux("phi", &mesh, &u);
    let mut db = FieldDb::new();
    db.insert(u).unwrap();
    assert!(model.correct(&FlowInputs::new(&db, &phi, 1e-5, 0.01)).is_err());

    // 类型不符同样报错
    db.insert(VolField::uniform("ks", &mesh, DVec3::X)).unwrap();
    assert!(model.correct(&FlowInputs::new(&db, &phi, 1e-5, 0.01)).is_err());
}

/// 测试 correct() 出错时模型状态保持调用前的值
#[test]
fn test_failed_correct_leaves_state_untouched() {
    let mesh = mesh();
    let wd = WallDistance::compute(&mesh);
    // yMin 的源字段存在，yMax 的缺失：yMin 先更新，随后 yMax 报错
    let boundary = Dictionary::from_json_str(
        r#"{
            "yMin": { "type": "fieldBasedGradient", "gradient": 0, "field": "kw", "gradCoeff": 3.0 },
            "yMax": { "type": "fieldBasedGradient", "gradient": 0, "field": "ks", "gradCoeff": 1.0 }
        }"#,
    )
    .unwrap();
    let mut model = ModelBuilder::new(&mesh, &wd)
        .kind(ClosureKind::Wa2017Des)
        .initial_rnu(1.0)
        .rnu_boundary(boundary)
        .build()
        .unwrap();

    let internal = (0..mesh.n_cells())
        .map(|c| DVec3::new(2.0 * mesh.cell_centre(c).y, 0.0, 0.0))
        .collect();
    let u = VolField::from_internal("U", &mesh, internal).unwrap();
    let phi = SurfaceScalarField::flux("phi", &mesh, &u);
    let mut db = FieldDb::new();
    db.insert(u).unwrap();
    db.insert(VolField::uniform("kw", &mesh, 1e-3)).unwrap();

    let rnu = model.rnu().clone();
    let f1 = model.f1().clone();
    let strain = model.strain().clone();
    let fdes = model.fdes().unwrap().clone();
    let les = model.les_region().unwrap();
    let d2 = model.d2_applied().to_vec();
    let bcs = model.rnu_boundary().clone();

    assert!(model.correct(&FlowInputs::new(&db, &phi, 1e-5, 0.01)).is_err());
    assert_eq!(model.rnu(), &rnu);
    assert_eq!(model.f1(), &f1);
    assert_eq!(model.strain(), &strain);
    assert_eq!(model.fdes().unwrap(), &fdes);
    assert_eq!(model.les_region().unwrap(), les);
    assert_eq!(model.d2_applied(), d2.as_slice());
    assert_eq!(model.rnu_boundary(), &bcs);
    assert!(model.last_stats().is_none());

    // 补上源字段后正常推进
    db.insert(VolField::uniform("ks", &mesh, 1e-3)).unwrap();
    model.correct(&FlowInputs::new(&db, &phi, 1e-5, 0.01)).unwrap();
    assert!(model.last_stats().is_some());
    assert_ne!(model.les_region().unwrap(), les);
}
