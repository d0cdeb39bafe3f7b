//! Handlebars templates for generated Go sources and HTML views
//!
//! Templates are embedded in the binary and rendered with HTML escaping
//! disabled since the output is source code. Go `html/template` actions in
//! the views (`{{.Field}}`, `{{range .Records}}`) are passed in as data so
//! Handlebars never has to parse them.

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::ScaffoldResult;

/// Every template the generator renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaffoldTemplate {
    /// GORM model file
    Model,
    /// Fiber handler file
    Handler,
    /// Route group block spliced into the routes file
    RouteBlock,
    /// Routes file header, used when the file does not exist yet
    RoutesPreamble,
    /// Migrations file header, used when the file does not exist yet
    MigrationsPreamble,
    /// List view
    IndexView,
    /// Create form
    InsertView,
    /// Detail view
    ShowView,
    /// Edit form
    EditView,
    /// Delete confirmation
    DeleteView,
}

impl ScaffoldTemplate {
    /// View templates with the file name each one is written to
    pub const VIEWS: [(Self, &'static str); 5] = [
        (Self::IndexView, "index.html"),
        (Self::InsertView, "insert.html"),
        (Self::ShowView, "show.html"),
        (Self::EditView, "edit.html"),
        (Self::DeleteView, "delete.html"),
    ];

    const fn source(self) -> &'static str {
        match self {
            Self::Model => MODEL,
            Self::Handler => HANDLER,
            Self::RouteBlock => ROUTE_BLOCK,
            Self::RoutesPreamble => ROUTES_PREAMBLE,
            Self::MigrationsPreamble => MIGRATIONS_PREAMBLE,
            Self::IndexView => INDEX_VIEW,
            Self::InsertView => INSERT_VIEW,
            Self::ShowView => SHOW_VIEW,
            Self::EditView => EDIT_VIEW,
            Self::DeleteView => DELETE_VIEW,
        }
    }
}

/// Renders [`ScaffoldTemplate`]s
pub struct TemplateRegistry {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    /// Create a registry
    #[must_use]
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();

        // Disable HTML escaping since we're generating code
        handlebars.register_escape_fn(handlebars::no_escape);

        Self { handlebars }
    }

    /// Render `template` against `data`
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ScaffoldError::Template`] if rendering fails.
    pub fn render<T: Serialize>(&self, template: ScaffoldTemplate, data: &T) -> ScaffoldResult<String> {
        Ok(self.handlebars.render_template(template.source(), data)?)
    }
}

const MODEL: &str = r#"package models

import (
{{#if has_time}}	"time"

{{/if}}	"gorm.io/gorm"
)

// {{model_name}} model
type {{model_name}} struct {
{{struct_body}}
}
"#;

const MIGRATIONS_PREAMBLE: &str = r#"package {{package}}

import (
	"gorm.io/gorm"

	"{{project_name}}/models"
)

// Migrate creates or updates the tables of every scaffolded model.
func Migrate(db *gorm.DB) {
"#;

const ROUTES_PREAMBLE: &str = r#"package {{package}}

import (
	"github.com/gofiber/fiber/v2"
	"gorm.io/gorm"

	"{{project_name}}/handlers"
)

// SetupRoutes mounts the application routes.
func SetupRoutes(app *fiber.App, dbGorm *gorm.DB) {
	app.Get("/", func(c *fiber.Ctx) error {
		return c.Render("index", fiber.Map{
			"Title": "Hello, Fiber!",
		})
	})
"#;

const ROUTE_BLOCK: &str = r#"
	// {{model_name}} routes
	{{var_name}} := app.Group("{{route_path}}")
	{{var_name}}.Get("/", handlers.Get{{model_plural}}(dbGorm))
	{{var_name}}.Get("/insert", handlers.Insert{{model_name}}())
	{{var_name}}.Post("/", handlers.Create{{model_name}}(dbGorm))
	{{var_name}}.Get("/:id", handlers.Show{{model_name}}(dbGorm))
	{{var_name}}.Get("/:id/edit", handlers.Edit{{model_name}}(dbGorm))
	{{var_name}}.Put("/:id", handlers.Update{{model_name}}(dbGorm))
	{{var_name}}.Get("/:id/delete", handlers.Delete{{model_name}}(dbGorm))
	{{var_name}}.Delete("/:id", handlers.Destroy{{model_name}}(dbGorm))
"#;

const HANDLER: &str = r#"package handlers

import (
	"github.com/gofiber/fiber/v2"
	"gorm.io/gorm"

	"{{project_name}}/models"
)

// Get{{model_plural}} lists every {{model_name}}
func Get{{model_plural}}(db *gorm.DB) fiber.Handler {
	return func(c *fiber.Ctx) error {
		var {{var_plural}} []models.{{model_name}}
		if result := db.Find(&{{var_plural}}); result.Error != nil {
			return c.Status(fiber.StatusInternalServerError).JSON(fiber.Map{
				"error": result.Error.Error(),
			})
		}
		return c.Render("{{view_dir}}/index", fiber.Map{
			"Title":   "All {{plural_title}}",
			"Records": {{var_plural}},
		}, "layouts/main")
	}
}

// Insert{{model_name}} renders the create form
func Insert{{model_name}}() fiber.Handler {
	return func(c *fiber.Ctx) error {
		return c.Render("{{view_dir}}/insert", fiber.Map{
			"Title": "Add New {{title}}",
		}, "layouts/main")
	}
}

// Create{{model_name}} stores a submitted {{model_name}}
func Create{{model_name}}(db *gorm.DB) fiber.Handler {
	return func(c *fiber.Ctx) error {
		{{var_name}} := new(models.{{model_name}})
		if err := c.BodyParser({{var_name}}); err != nil {
			return c.Status(fiber.StatusBadRequest).JSON(fiber.Map{
				"error": "Cannot parse request body",
			})
		}
		if result := db.Create({{var_name}}); result.Error != nil {
			return c.Status(fiber.StatusInternalServerError).JSON(fiber.Map{
				"error": result.Error.Error(),
			})
		}
		return c.Redirect("{{route_path}}")
	}
}

func find{{model_name}}(db *gorm.DB, c *fiber.Ctx) (*models.{{model_name}}, error) {
	var {{var_name}} models.{{model_name}}
	if err := db.First(&{{var_name}}, c.Params("id")).Error; err != nil {
		return nil, c.Status(fiber.StatusNotFound).JSON(fiber.Map{
			"error": "{{model_name}} not found",
		})
	}
	return &{{var_name}}, nil
}

// Show{{model_name}} renders one {{model_name}}
func Show{{model_name}}(db *gorm.DB) fiber.Handler {
	return func(c *fiber.Ctx) error {
		{{var_name}}, err := find{{model_name}}(db, c)
		if {{var_name}} == nil {
			return err
		}
		return c.Render("{{view_dir}}/show", fiber.Map{"{{var_name}}": {{var_name}}, "Title": "Show {{title}}"}, "layouts/main")
	}
}

// Edit{{model_name}} renders the edit form
func Edit{{model_name}}(db *gorm.DB) fiber.Handler {
	return func(c *fiber.Ctx) error {
		{{var_name}}, err := find{{model_name}}(db, c)
		if {{var_name}} == nil {
			return err
		}
		return c.Render("{{view_dir}}/edit", fiber.Map{"{{var_name}}": {{var_name}}, "Title": "Edit {{title}}"}, "layouts/main")
	}
}

// Update{{model_name}} applies a submitted update
func Update{{model_name}}(db *gorm.DB) fiber.Handler {
	return func(c *fiber.Ctx) error {
		{{var_name}}, err := find{{model_name}}(db, c)
		if {{var_name}} == nil {
			return err
		}
		if err := c.BodyParser({{var_name}}); err != nil {
			return c.Status(fiber.StatusBadRequest).JSON(fiber.Map{
				"error": "Cannot parse request body",
			})
		}
		if err := db.Save({{var_name}}).Error; err != nil {
			return c.Status(fiber.StatusInternalServerError).JSON(fiber.Map{
				"error": "Failed to update {{model_name}}",
			})
		}
		return c.JSON(fiber.Map{"redirectUrl": "{{route_path}}"})
	}
}

// Delete{{model_name}} renders the delete confirmation
func Delete{{model_name}}(db *gorm.DB) fiber.Handler {
	return func(c *fiber.Ctx) error {
		{{var_name}}, err := find{{model_name}}(db, c)
		if {{var_name}} == nil {
			return err
		}
		return c.Render("{{view_dir}}/delete", fiber.Map{"{{var_name}}": {{var_name}}, "Title": "Delete {{title}}"}, "layouts/main")
	}
}

// Destroy{{model_name}} deletes a {{model_name}}
func Destroy{{model_name}}(db *gorm.DB) fiber.Handler {
	return func(c *fiber.Ctx) error {
		{{var_name}}, err := find{{model_name}}(db, c)
		if {{var_name}} == nil {
			return err
		}
		if err := db.Unscoped().Delete({{var_name}}).Error; err != nil {
			return c.Status(fiber.StatusInternalServerError).JSON(fiber.Map{
				"error": "Failed to delete {{model_name}}",
			})
		}
		return c.JSON(fiber.Map{"redirectUrl": "{{route_path}}"})
	}
}
"#;

const INDEX_VIEW: &str = r#"<h2>All {{plural_title}}</h2>
<a href="{{route_path}}/insert">Add +</a>
<table>
    <thead>
        <tr>{{#each fields}}<th>{{this.label}}</th>{{/each}}<th>Actions</th><th>Created At</th></tr>
    </thead>
    <tbody>{{go.range_records}}<tr>{{#each fields}}<td>{{this.row_ref}}</td>{{/each}}
        <td>
            <a href="{{route_path}}/{{go.row_id}}/edit">Edit</a> |
            <a href="{{route_path}}/{{go.row_id}}/delete">Delete</a>
        </td>
        <td>{{go.row_created_at}}</td>
    </tr>{{go.end}}</tbody>
</table>
"#;

const INSERT_VIEW: &str = r#"<h2>Add {{title}}</h2>
<form action="{{route_path}}" method="POST">
{{#each fields}}    <label for="{{this.name}}">{{this.label}}:</label>
    <input type="{{this.input_type}}" id="{{this.name}}" name="{{this.name}}">
{{/each}}    <button type="submit">Add {{title}}</button>
</form>
"#;

const SHOW_VIEW: &str = r#"<h2>Show {{title}}</h2>
<table>
    <tbody>{{#each fields}}<tr><th>{{this.label}}</th><td>{{this.record_ref}}</td></tr>{{/each}}</tbody>
</table>
<a href="{{route_path}}">Back</a>
"#;

const EDIT_VIEW: &str = r#"<h2>Edit {{title}}</h2>
<form id="editForm">
{{#each fields}}    <label for="{{this.name}}">{{this.label}}:</label>
    <input type="{{this.input_type}}" id="{{this.name}}" name="{{this.name}}" value="{{this.record_ref}}">
{{/each}}    <button type="submit">Update {{title}}</button>
</form>

<script>
    document.getElementById('editForm').addEventListener('submit', async function (event) {
        event.preventDefault();
        const jsonData = {};
        Array.from(event.target.elements).forEach(function (input) {
            if (!input.name) {
                return;
            }
            jsonData[input.name] = input.type === 'number' ? Number(input.value) : input.value;
        });

        const response = await fetch('{{route_path}}/{{go.record_id}}', {
            method: 'PUT',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify(jsonData)
        });

        if (response.ok) {
            window.location.href = '{{route_path}}';
        } else {
            const errorData = await response.json();
            alert('Error: ' + errorData.error);
        }
    });
</script>
"#;

const DELETE_VIEW: &str = r#"<h2>Delete {{title}}</h2>
<table>
    <tbody>{{#each fields}}<tr><th>{{this.label}}</th><td>{{this.record_ref}}</td></tr>{{/each}}</tbody>
</table>
<form id="deleteForm">
    <button type="submit">Delete</button>
</form>
<a href="{{route_path}}">Back</a>

<script>
    document.getElementById('deleteForm').addEventListener('submit', async function (event) {
        event.preventDefault();
        if (!confirm('Are you sure you want to delete this?')) {
            return;
        }

        const response = await fetch('{{route_path}}/{{go.record_id}}', {
            method: 'DELETE',
            headers: { 'Content-Type': 'application/json' }
        });

        if (response.ok) {
            window.location.href = '{{route_path}}';
        } else {
            const errorData = await response.json();
            alert('Error: ' + errorData.error);
        }
    });
</script>
"#;
