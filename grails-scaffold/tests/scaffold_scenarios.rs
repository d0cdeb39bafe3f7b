//! End-to-end scaffold scenarios against a real project directory

use grails_scaffold::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn config() -> ScaffoldConfig {
    ScaffoldConfig {
        project_name: "github.com/acme/shop".to_string(),
        ..ScaffoldConfig::default()
    }
}

fn read(dir: &TempDir, path: &str) -> String {
    fs::read_to_string(dir.path().join(path)).unwrap()
}

fn order() -> EntitySpec {
    EntitySpec::new(
        "order",
        vec![FieldSpec::new("customer", "VARCHAR(255)"), FieldSpec::new("placed_at", "DATETIME")],
    )
}

fn order_item() -> EntitySpec {
    EntitySpec::new(
        "order_item",
        vec![FieldSpec::new("quantity", "INT"), FieldSpec::new("price", "DECIMAL")],
    )
    .with_reference("order")
}

#[test]
fn test_order_item_scenario() {
    let dir = TempDir::new().unwrap();
    let config = config();
    let store = FsStore::new(dir.path());
    let scaffolder = Scaffolder::new(&config, &store);

    scaffolder.scaffold(&order(), ScaffoldOptions::default()).unwrap();
    let report = scaffolder
        .scaffold(&order_item(), ScaffoldOptions::default())
        .unwrap();
    assert_eq!(report.identifier, "OrderItem");

    let model = read(&dir, "models/order_item.go");
    assert!(model.contains("type OrderItem struct {"));
    assert!(model.contains("\tQuantity int\n"));
    assert!(model.contains("\tPrice float64\n"));
    assert!(model.contains("\tOrderID int\n"));
    assert!(model.contains("\tOrder Order `gorm:\"foreignKey:OrderID;references:ID\"`"));

    let migrations = read(&dir, "helpers/migrations.go");
    assert!(migrations.starts_with("package helpers\n"));
    assert!(migrations.contains(
        "\tdb.AutoMigrate(&models.Order{})\n\tdb.AutoMigrate(&models.OrderItem{})\n}\n"
    ));

    let routes = read(&dir, "internals/routes.go");
    assert!(routes.contains("orderItem := app.Group(\"/order_items\")"));
    assert!(routes.contains("order := app.Group(\"/orders\")"));
    assert!(routes.ends_with("}\n"));
    assert!(routes.find("// Order routes") < routes.find("// OrderItem routes"));

    let index = read(&dir, "internals/models.go");
    assert_eq!(index.matches("import \"github.com/acme/shop/models\"").count(), 1);
    assert!(index.contains("\t&models.Order{},\n\t&models.OrderItem{},\n}"));

    let registry = EntityRegistry::load(&store, Path::new("models.json")).unwrap();
    assert_eq!(registry.names(), vec!["Order", "OrderItem"]);
    assert_eq!(
        registry.get("OrderItem").unwrap(),
        &[FieldSpec::new("quantity", "INT"), FieldSpec::new("price", "DECIMAL")]
    );

    for view in ["index", "insert", "show", "edit", "delete"] {
        assert!(dir
            .path()
            .join(format!("views/order_items/{view}.html"))
            .is_file());
    }
}

#[test]
fn test_rescaffold_scenario() {
    let dir = TempDir::new().unwrap();
    let config = config();
    let store = FsStore::new(dir.path());
    let scaffolder = Scaffolder::new(&config, &store);

    scaffolder.scaffold(&order(), ScaffoldOptions::default()).unwrap();
    let migrations_before = read(&dir, "helpers/migrations.go");

    let rejected = scaffolder.scaffold(&order(), ScaffoldOptions::default());
    assert!(matches!(rejected, Err(ScaffoldError::DuplicateEntity(_))));

    let revised = EntitySpec::new("order", vec![FieldSpec::new("total", "NUMERIC")]);
    let options = ScaffoldOptions {
        replace: true,
        ..ScaffoldOptions::default()
    };
    scaffolder.scaffold(&revised, options).unwrap();

    assert_eq!(read(&dir, "helpers/migrations.go"), migrations_before);
    assert!(read(&dir, "models/order.go").contains("\tTotal float64\n"));

    let manifest = read(&dir, "models.json");
    assert_eq!(manifest.matches("\"Order\"").count(), 1);
    let registry = EntityRegistry::parse(Path::new("models.json"), &manifest).unwrap();
    assert_eq!(registry.get("Order").unwrap(), &[FieldSpec::new("total", "NUMERIC")]);
}

#[test]
fn test_hand_edited_artifacts_are_preserved() {
    let dir = TempDir::new().unwrap();
    let config = config();
    let store = FsStore::new(dir.path());
    let scaffolder = Scaffolder::new(&config, &store);

    scaffolder.scaffold(&order(), ScaffoldOptions::default()).unwrap();

    let routes_path = dir.path().join("internals/routes.go");
    let edited = read(&dir, "internals/routes.go").replace(
        "\t// Order routes\n",
        "\t// Order routes (custom auth below)\n\tapp.Use(\"/orders\", requireLogin)\n",
    );
    fs::write(&routes_path, &edited).unwrap();

    scaffolder
        .scaffold(&order_item(), ScaffoldOptions::default())
        .unwrap();

    let routes = read(&dir, "internals/routes.go");
    assert!(routes.starts_with(edited.strip_suffix("}\n").unwrap()));
    assert!(routes.contains("// OrderItem routes"));
}

#[test]
fn test_corrupted_artifact_is_left_untouched() {
    let dir = TempDir::new().unwrap();
    let config = config();
    let store = FsStore::new(dir.path());

    fs::create_dir_all(dir.path().join("helpers")).unwrap();
    let corrupted = "package helpers\n\nfunc Migrate(db *gorm.DB) {\n\tdb.AutoMigrate(&models.Order{})\n";
    fs::write(dir.path().join("helpers/migrations.go"), corrupted).unwrap();

    let result = Scaffolder::new(&config, &store).scaffold(&order_item(), ScaffoldOptions::default());

    assert!(matches!(result, Err(ScaffoldError::MalformedArtifact { .. })));
    assert_eq!(read(&dir, "helpers/migrations.go"), corrupted);
    assert!(!dir.path().join("models/order_item.go").exists());
    assert!(!dir.path().join("models.json").exists());
}

#[test]
fn test_config_paths_are_honored() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("grails.toml"),
        "project_name = \"example.com/blog\"\n\n[paths]\nregistry = \"meta/entities.json\"\n",
    )
    .unwrap();

    let config: ScaffoldConfig = ScaffoldConfig::figment(dir.path()).extract().unwrap();
    let store = FsStore::new(dir.path());
    let post = EntitySpec::new("post", vec![FieldSpec::new("title", "TEXT")]);

    Scaffolder::new(&config, &store)
        .scaffold(&post, ScaffoldOptions::default())
        .unwrap();

    assert!(dir.path().join("meta/entities.json").is_file());
    assert!(read(&dir, "handlers/post_handlers.go").contains("\"example.com/blog/models\""));
}
