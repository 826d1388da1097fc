// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed set of tools the model may call, and their JSON schemas.

use inmobot_core::types::ToolDefinition;
use serde_json::json;
use strum::{Display, EnumString};

/// One of the three tools offered to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ToolKind {
    ShowCatalog,
    SearchProperties,
    SaveLeadInfo,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [
        ToolKind::ShowCatalog,
        ToolKind::SearchProperties,
        ToolKind::SaveLeadInfo,
    ];

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::ShowCatalog => {
                "Muestra el catálogo completo de propiedades, agrupado en venta y alquiler. \
                 Úsala cuando el cliente quiera ver todas las opciones disponibles."
            }
            ToolKind::SearchProperties => "Busca propiedades según los criterios del cliente",
            ToolKind::SaveLeadInfo => {
                "Guarda información del cliente potencial cuando la proporciona"
            }
        }
    }

    /// JSON Schema of the arguments object.
    pub fn parameters(self) -> serde_json::Value {
        match self {
            ToolKind::ShowCatalog => json!({
                "type": "object",
                "properties": {}
            }),
            ToolKind::SearchProperties => json!({
                "type": "object",
                "properties": {
                    "zone": {
                        "type": "string",
                        "description": "Zona de Lima (ej: San Isidro, Miraflores, Surco)"
                    },
                    "property_type": {
                        "type": "string",
                        "enum": ["casa", "departamento"],
                        "description": "Tipo de propiedad"
                    },
                    "max_price": {
                        "type": "integer",
                        "description": "Precio máximo en dólares"
                    },
                    "min_bedrooms": {
                        "type": "integer",
                        "description": "Número mínimo de habitaciones"
                    }
                }
            }),
            ToolKind::SaveLeadInfo => json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Nombre completo del cliente" },
                    "phone": { "type": "string", "description": "Número de teléfono" },
                    "email": { "type": "string", "description": "Correo electrónico" },
                    "budget_min": {
                        "type": "integer",
                        "description": "Presupuesto mínimo en dólares"
                    },
                    "budget_max": {
                        "type": "integer",
                        "description": "Presupuesto máximo en dólares"
                    },
                    "zone": { "type": "string", "description": "Zona de interés" },
                    "property_type": {
                        "type": "string",
                        "description": "Tipo de propiedad buscada"
                    },
                    "bedrooms": { "type": "integer", "description": "Número de habitaciones" },
                    "urgency": {
                        "type": "string",
                        "enum": ["inmediato", "1-3 meses", "3-6 meses", "explorando"],
                        "description": "Nivel de urgencia"
                    },
                    "interested_property": {
                        "type": "string",
                        "description": "ID de propiedad que le interesa"
                    },
                    "wants_visit": {
                        "type": "boolean",
                        "description": "Si quiere agendar visita"
                    }
                }
            }),
        }
    }

    pub fn definition(self) -> ToolDefinition {
        ToolDefinition {
            name: self.to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Definitions for every tool, sorted by name.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    let mut defs: Vec<ToolDefinition> = ToolKind::ALL.iter().map(|k| k.definition()).collect();
    defs.sort_by(|a, b| a.name.cmp(&b.name));
    defs
}
