//! The fixed few-shot conversation primer.
//!
//! Output format compliance is entirely a product of prompting: the primer
//! anchors the model on a bracketed, comma-separated, quoted-string list with
//! no schema enforcement at the API level. The extractor in
//! [`crate::extract`] handles whatever the model sends back anyway.

use crate::llm::ChatMessage;

const BASE_PROMPT: &str = "Dada una tarea, genera una lista de entre 1 a 8 subtareas que permitan resolverla. \nUsa textos con no más de 128 caracteres.";

/// Three example exchanges demonstrating the desired list format.
const EXAMPLE_EXCHANGES: [(&str, &str); 3] = [
    (
        "Tarea: Aprender inglés",
        "['Aprender el alfabeto y la pronunciación', 'Construir vocabulario básico', 'Estudiar gramática', 'Practicar la escucha', 'Leer en inglés', 'Escribir en inglés', 'Hablar inglés', 'Usar recursos']",
    ),
    (
        "Tarea: Ir de vacaciones a Torres del Paine, Chile",
        "['Investigar y elegir fechas', 'Reservar alojamiento', 'Planificar transporte', 'Definir itinerario', 'Preparar equipo', 'Comprar entradas', 'Organizar comidas']",
    ),
    (
        "Tarea: Aprender el framework NextJS",
        "['Aprender los fundamentos de React', 'Configurar un entorno de desarrollo', 'Explorar la estructura de un proyecto Next.js', 'Aprender a crear páginas y enrutamiento', 'Integrar datos y APIs']",
    ),
];

/// Build the message sequence for a completion request: the six primer
/// messages followed by one user message carrying the new task.
pub fn build_messages(task_title: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(EXAMPLE_EXCHANGES.len() * 2 + 1);
    for (i, (user, assistant)) in EXAMPLE_EXCHANGES.iter().enumerate() {
        // The instruction rides on the first example only
        if i == 0 {
            messages.push(ChatMessage::user(format!("{}\n\n{}", BASE_PROMPT, user)));
        } else {
            messages.push(ChatMessage::user(*user));
        }
        messages.push(ChatMessage::assistant(*assistant));
    }
    messages.push(ChatMessage::user(format!("Tarea: {}", task_title)));
    messages
}
