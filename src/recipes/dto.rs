use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::store::FieldUpdates;
use crate::validate::{is_valid_url, non_empty, FieldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dificultad {
    #[serde(rename = "Fácil")]
    Facil,
    Media,
    #[serde(rename = "Difícil")]
    Dificil,
}

impl Dificultad {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "Fácil" => Some(Self::Facil),
            "Media" => Some(Self::Media),
            "Difícil" => Some(Self::Dificil),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingrediente {
    pub nombre: String,
    pub cantidad: String,
}

/// Denormalized author snapshot embedded in every recipe. A copy, not a
/// reference: it only changes when the user directory propagates an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Autor {
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub titulo: String,
    pub descripcion: String,
    pub categoria: String,
    pub dificultad: Dificultad,
    #[serde(rename = "tiempoPreparacion")]
    pub tiempo_preparacion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imagen: Option<String>,
    pub autor: Autor,
    pub ingredientes: Vec<Ingrediente>,
    pub instrucciones: Vec<String>,
    pub porciones: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calificacion: Option<f64>,
}

fn require_string(
    body: &Value,
    field: &str,
    type_msg: &str,
    empty_msg: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match body.get(field) {
        Some(Value::String(s)) if non_empty(s) => Some(s.clone()),
        Some(Value::String(_)) => {
            errors.push(FieldError::new(field, empty_msg));
            None
        }
        _ => {
            errors.push(FieldError::new(field, type_msg));
            None
        }
    }
}

impl Recipe {
    /// Full-shape schema for creation. Any client-supplied `id` never makes
    /// it into the draft, so the store always assigns one.
    pub fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let titulo = require_string(
            body,
            "titulo",
            "El título debe ser un texto.",
            "El título es obligatorio.",
            &mut errors,
        );
        let descripcion = require_string(
            body,
            "descripcion",
            "La descripción debe ser un texto.",
            "La descripción es obligatoria.",
            &mut errors,
        );
        let categoria = require_string(
            body,
            "categoria",
            "La categoría debe ser un texto.",
            "La categoría es obligatoria.",
            &mut errors,
        );

        let dificultad = match body.get("dificultad").and_then(Value::as_str) {
            Some(v) => match Dificultad::parse(v) {
                Some(d) => Some(d),
                None => {
                    errors.push(FieldError::new(
                        "dificultad",
                        "La dificultad debe ser: Fácil, Media o Difícil.",
                    ));
                    None
                }
            },
            None => {
                errors.push(FieldError::new(
                    "dificultad",
                    "La dificultad debe ser: Fácil, Media o Difícil.",
                ));
                None
            }
        };

        let tiempo_preparacion = require_string(
            body,
            "tiempoPreparacion",
            "El tiempo debe ser un texto.",
            "El tiempo es obligatorio.",
            &mut errors,
        );

        let imagen = match body.get("imagen") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                errors.push(FieldError::new("imagen", "La imagen debe ser texto."));
                None
            }
        };

        let autor = Self::autor_from_value(body.get("autor"), &mut errors);
        let ingredientes = Self::ingredientes_from_value(body.get("ingredientes"), &mut errors);
        let instrucciones = Self::instrucciones_from_value(body.get("instrucciones"), &mut errors);

        let porciones = require_string(
            body,
            "porciones",
            "Las porciones deben ser texto.",
            "Las porciones son obligatorias.",
            &mut errors,
        );

        let calificacion = match body.get("calificacion") {
            None | Some(Value::Null) => None,
            Some(v) => match v.as_f64() {
                Some(n) if (0.0..=5.0).contains(&n) => Some(n),
                _ => {
                    errors.push(FieldError::new(
                        "calificacion",
                        "La calificación debe ser un número entre 0 y 5.",
                    ));
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self {
            titulo: titulo.unwrap_or_default(),
            descripcion: descripcion.unwrap_or_default(),
            categoria: categoria.unwrap_or_default(),
            dificultad: dificultad.unwrap_or(Dificultad::Media),
            tiempo_preparacion: tiempo_preparacion.unwrap_or_default(),
            imagen,
            autor: autor.unwrap_or(Autor {
                nombre: String::new(),
                avatar: None,
            }),
            ingredientes: ingredientes.unwrap_or_default(),
            instrucciones: instrucciones.unwrap_or_default(),
            porciones: porciones.unwrap_or_default(),
            calificacion,
        })
    }

    fn autor_from_value(autor: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<Autor> {
        let nombre = match autor.and_then(|a| a.get("nombre")) {
            Some(Value::String(s)) if non_empty(s) => Some(s.clone()),
            Some(Value::String(_)) => {
                errors.push(FieldError::new(
                    "autor.nombre",
                    "El nombre del autor es obligatorio.",
                ));
                None
            }
            _ => {
                errors.push(FieldError::new(
                    "autor.nombre",
                    "El nombre del autor debe ser un texto.",
                ));
                None
            }
        };
        let avatar = match autor.and_then(|a| a.get("avatar")) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                errors.push(FieldError::new("autor.avatar", "El avatar debe ser texto."));
                None
            }
        };
        nombre.map(|nombre| Autor { nombre, avatar })
    }

    fn ingredientes_from_value(
        value: Option<&Value>,
        errors: &mut Vec<FieldError>,
    ) -> Option<Vec<Ingrediente>> {
        let items = match value.and_then(Value::as_array) {
            Some(items) => items,
            None => {
                errors.push(FieldError::new(
                    "ingredientes",
                    "Los ingredientes deben ser una lista.",
                ));
                return None;
            }
        };
        if items.is_empty() {
            errors.push(FieldError::new(
                "ingredientes",
                "Se requiere al menos un ingrediente.",
            ));
            return None;
        }

        let mut parsed = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let nombre = match item.get("nombre") {
                Some(Value::String(s)) if non_empty(s) => Some(s.clone()),
                Some(Value::String(_)) => {
                    errors.push(FieldError::new(
                        format!("ingredientes[{i}].nombre"),
                        "El nombre del ingrediente es obligatorio.",
                    ));
                    None
                }
                _ => {
                    errors.push(FieldError::new(
                        format!("ingredientes[{i}].nombre"),
                        "El nombre del ingrediente debe ser un texto.",
                    ));
                    None
                }
            };
            let cantidad = match item.get("cantidad") {
                Some(Value::String(s)) if non_empty(s) => Some(s.clone()),
                Some(Value::String(_)) => {
                    errors.push(FieldError::new(
                        format!("ingredientes[{i}].cantidad"),
                        "La cantidad del ingrediente es obligatoria.",
                    ));
                    None
                }
                _ => {
                    errors.push(FieldError::new(
                        format!("ingredientes[{i}].cantidad"),
                        "La cantidad del ingrediente debe ser un texto.",
                    ));
                    None
                }
            };
            if let (Some(nombre), Some(cantidad)) = (nombre, cantidad) {
                parsed.push(Ingrediente { nombre, cantidad });
            }
        }
        Some(parsed)
    }

    fn instrucciones_from_value(
        value: Option<&Value>,
        errors: &mut Vec<FieldError>,
    ) -> Option<Vec<String>> {
        let items = match value.and_then(Value::as_array) {
            Some(items) => items,
            None => {
                errors.push(FieldError::new(
                    "instrucciones",
                    "Las instrucciones deben ser una lista de pasos.",
                ));
                return None;
            }
        };
        if items.is_empty() {
            errors.push(FieldError::new(
                "instrucciones",
                "Se requiere al menos un paso de instrucción.",
            ));
            return None;
        }

        let mut parsed = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(s) if non_empty(s) => parsed.push(s.clone()),
                Value::String(_) => errors.push(FieldError::new(
                    format!("instrucciones[{i}]"),
                    "Las instrucciones no pueden estar vacías.",
                )),
                _ => errors.push(FieldError::new(
                    format!("instrucciones[{i}]"),
                    "Cada instrucción debe ser un texto.",
                )),
            }
        }
        Some(parsed)
    }
}

/// The supplied subset of recipe fields for a partial update. Only
/// type/shape is checked, and only for fields that are present.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub titulo: Option<String>,
    pub descripcion: Option<String>,
    pub categoria: Option<String>,
    pub dificultad: Option<Dificultad>,
    pub tiempo_preparacion: Option<String>,
    pub imagen: Option<String>,
    pub autor_nombre: Option<String>,
    pub autor_avatar: Option<String>,
    pub ingredientes: Option<Vec<Ingrediente>>,
    pub instrucciones: Option<Vec<String>>,
    pub porciones: Option<String>,
    pub calificacion: Option<f64>,
}

fn optional_string(
    body: &Value,
    field: &str,
    type_msg: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match body.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(field, type_msg));
            None
        }
    }
}

impl RecipePatch {
    pub fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut patch = Self {
            titulo: optional_string(body, "titulo", "El título debe ser un texto.", &mut errors),
            descripcion: optional_string(
                body,
                "descripcion",
                "La descripción debe ser un texto.",
                &mut errors,
            ),
            categoria: optional_string(
                body,
                "categoria",
                "La categoría debe ser un texto.",
                &mut errors,
            ),
            tiempo_preparacion: optional_string(
                body,
                "tiempoPreparacion",
                "El tiempo debe ser un texto.",
                &mut errors,
            ),
            porciones: optional_string(
                body,
                "porciones",
                "Las porciones deben ser texto.",
                &mut errors,
            ),
            ..Self::default()
        };

        match body.get("dificultad") {
            None | Some(Value::Null) => {}
            Some(v) => match v.as_str().and_then(Dificultad::parse) {
                Some(d) => patch.dificultad = Some(d),
                None => errors.push(FieldError::new(
                    "dificultad",
                    "La dificultad debe ser: Fácil, Media o Difícil.",
                )),
            },
        }

        match body.get("imagen") {
            None | Some(Value::Null) => {}
            Some(v) => match v.as_str() {
                Some(s) if is_valid_url(s) => patch.imagen = Some(s.to_string()),
                _ => errors.push(FieldError::new(
                    "imagen",
                    "La imagen debe ser una URL válida.",
                )),
            },
        }

        if let Some(autor) = body.get("autor") {
            match autor.get("nombre") {
                None | Some(Value::Null) => {}
                Some(v) => match v.as_str() {
                    Some(s) => patch.autor_nombre = Some(s.to_string()),
                    None => errors.push(FieldError::new(
                        "autor.nombre",
                        "El nombre del autor debe ser un texto.",
                    )),
                },
            }
            match autor.get("avatar") {
                None | Some(Value::Null) => {}
                Some(v) => match v.as_str() {
                    Some(s) if is_valid_url(s) => patch.autor_avatar = Some(s.to_string()),
                    _ => errors.push(FieldError::new(
                        "autor.avatar",
                        "El avatar debe ser una URL válida.",
                    )),
                },
            }
        }

        match body.get("ingredientes") {
            None | Some(Value::Null) => {}
            Some(v) => match serde_json::from_value::<Vec<Ingrediente>>(v.clone()) {
                Ok(items) => patch.ingredientes = Some(items),
                Err(_) => errors.push(FieldError::new(
                    "ingredientes",
                    "Los ingredientes deben ser una lista (array).",
                )),
            },
        }

        match body.get("instrucciones") {
            None | Some(Value::Null) => {}
            Some(v) => match serde_json::from_value::<Vec<String>>(v.clone()) {
                Ok(items) => patch.instrucciones = Some(items),
                Err(_) => errors.push(FieldError::new(
                    "instrucciones",
                    "Las instrucciones deben ser una lista (array) de pasos.",
                )),
            },
        }

        match body.get("calificacion") {
            None | Some(Value::Null) => {}
            Some(v) => match v.as_f64() {
                Some(n) if (0.0..=5.0).contains(&n) => patch.calificacion = Some(n),
                _ => errors.push(FieldError::new(
                    "calificacion",
                    "La calificación debe ser un número entre 0 y 5.",
                )),
            },
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.titulo.is_none()
            && self.descripcion.is_none()
            && self.categoria.is_none()
            && self.dificultad.is_none()
            && self.tiempo_preparacion.is_none()
            && self.imagen.is_none()
            && self.autor_nombre.is_none()
            && self.autor_avatar.is_none()
            && self.ingredientes.is_none()
            && self.instrucciones.is_none()
            && self.porciones.is_none()
            && self.calificacion.is_none()
    }

    /// Partial-update set for the store. Author fields go through dotted
    /// paths so a patch never clobbers the half of the snapshot it did not
    /// mention.
    pub fn to_field_updates(&self) -> FieldUpdates {
        let mut fields = FieldUpdates::new();
        if let Some(v) = &self.titulo {
            fields.push("titulo", json!(v));
        }
        if let Some(v) = &self.descripcion {
            fields.push("descripcion", json!(v));
        }
        if let Some(v) = &self.categoria {
            fields.push("categoria", json!(v));
        }
        if let Some(v) = &self.dificultad {
            fields.push("dificultad", json!(v));
        }
        if let Some(v) = &self.tiempo_preparacion {
            fields.push("tiempoPreparacion", json!(v));
        }
        if let Some(v) = &self.imagen {
            fields.push("imagen", json!(v));
        }
        if let Some(v) = &self.autor_nombre {
            fields.push("autor.nombre", json!(v));
        }
        if let Some(v) = &self.autor_avatar {
            fields.push("autor.avatar", json!(v));
        }
        if let Some(v) = &self.ingredientes {
            fields.push("ingredientes", json!(v));
        }
        if let Some(v) = &self.instrucciones {
            fields.push("instrucciones", json!(v));
        }
        if let Some(v) = &self.porciones {
            fields.push("porciones", json!(v));
        }
        if let Some(v) = &self.calificacion {
            fields.push("calificacion", json!(v));
        }
        fields
    }

    /// The supplied fields echoed back in the update response, mirroring
    /// the original `{message, id, ...updates}` shape.
    pub fn to_echo(&self) -> serde_json::Map<String, Value> {
        let mut echo = serde_json::Map::new();
        if let Some(v) = &self.titulo {
            echo.insert("titulo".into(), json!(v));
        }
        if let Some(v) = &self.descripcion {
            echo.insert("descripcion".into(), json!(v));
        }
        if let Some(v) = &self.categoria {
            echo.insert("categoria".into(), json!(v));
        }
        if let Some(v) = &self.dificultad {
            echo.insert("dificultad".into(), json!(v));
        }
        if let Some(v) = &self.tiempo_preparacion {
            echo.insert("tiempoPreparacion".into(), json!(v));
        }
        if let Some(v) = &self.imagen {
            echo.insert("imagen".into(), json!(v));
        }
        if self.autor_nombre.is_some() || self.autor_avatar.is_some() {
            let mut autor = serde_json::Map::new();
            if let Some(v) = &self.autor_nombre {
                autor.insert("nombre".into(), json!(v));
            }
            if let Some(v) = &self.autor_avatar {
                autor.insert("avatar".into(), json!(v));
            }
            echo.insert("autor".into(), Value::Object(autor));
        }
        if let Some(v) = &self.ingredientes {
            echo.insert("ingredientes".into(), json!(v));
        }
        if let Some(v) = &self.instrucciones {
            echo.insert("instrucciones".into(), json!(v));
        }
        if let Some(v) = &self.porciones {
            echo.insert("porciones".into(), json!(v));
        }
        if let Some(v) = &self.calificacion {
            echo.insert("calificacion".into(), json!(v));
        }
        echo
    }
}
