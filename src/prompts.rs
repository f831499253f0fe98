//! Prompt templates for the generative service

use crate::models::AppMode;

/// Style instructions injected for the professional register
pub const PROFESSIONAL_INSTRUCTIONS: &str = "Utiliza terminología técnica y precisa, adecuada para estudiantes y profesionales de la tecnología de los alimentos. Enfócate en los fundamentos científicos de cada paso. Asegúrate de que todas las unidades de medida correspondan al sistema SIMELA y que los números decimales usen coma (ej: 4,5).";

/// Style instructions injected for the beginner register
pub const BEGINNER_INSTRUCTIONS: &str = "Utiliza un lenguaje sencillo y claro, tipo 'casero', para que sea fácil de entender por familias o emprendedores. Evita la jerga técnica compleja pero sin sacrificar la precisión en los puntos clave de inocuidad. Menciona que las unidades de medida corresponden al sistema SIMELA y que los decimales usan coma (ej: 4,5). Al hablar de medir pH, recomienda usar la app 'Moracol' como una alternativa más certera a las tiras reactivas.";

/// Scripted reply used when a chat request fails
pub const CHAT_APOLOGY: &str =
    "Lo siento, no pude procesar tu pregunta en este momento. Inténtalo de nuevo.";

/// Status lines rotated while recipe content loads
pub const LOADING_MESSAGES: [&str; 6] = [
    "Cargando información sobre el producto...",
    "Consultando el Código Alimentario...",
    "Generando diagrama de flujo a medida...",
    "Escribiendo puntos críticos de control...",
    "Cargando los tuturiales elaborados...",
    "¡Casi listo!",
];

/// Style instructions for the given mode
pub fn mode_instructions(mode: AppMode) -> &'static str {
    match mode {
        AppMode::Profesional => PROFESSIONAL_INSTRUCTIONS,
        AppMode::Principiante => BEGINNER_INSTRUCTIONS,
    }
}

/// Prompt requesting the structured content for one recipe
pub fn content_prompt(preserve_name: &str, mode: AppMode) -> String {
    format!(
        r#"Actúa como un experto en ciencia de los alimentos y en el Código Alimentario Argentino.
Para el producto "{name}", proporciona la siguiente información en un único objeto JSON bien formado, siguiendo estas instrucciones de estilo: "{instructions}".

El objeto JSON debe contener:
1. definition: La definición oficial del producto tal como figura en el Código Alimentario Argentino.
2. process: Un proceso de elaboración detallado, paso a paso, adecuado para conservas caseras, garantizando la inocuidad alimentaria. El proceso debe estar formateado como un array de objetos. Cada objeto debe tener 'id', 'title', 'description' y 'shape'.
   IMPORTANTE: El diagrama de flujo DEBE comenzar con un paso `{{ "id": 1, "title": "Inicio", "shape": "terminator", "description": "Inicio del proceso de elaboración." }}` y DEBE concluir con un paso final `{{ "id": [ultimo_numero], "title": "Fin", "shape": "terminator", "description": "El producto está listo y seguro para su almacenamiento." }}`.
   Utiliza las formas de manera lógica: 'terminator' para inicio/fin, 'rectangle' para acciones y procesos, y 'diamond' para controles de calidad o decisiones.
3. youtubePlaylistId: El ID de una lista de reproducción de YouTube real y relevante que contenga tutoriales sobre cómo hacer {name}. Si no encuentras una lista, proporciona el ID de un video relevante.

Asegúrate de que la respuesta sea exclusivamente el objeto JSON solicitado, sin texto adicional."#,
        name = preserve_name,
        instructions = mode_instructions(mode),
    )
}

/// Prompt for one chat question about the current recipe
pub fn chat_prompt(query: &str, preserve_name: &str) -> String {
    format!(
        r#"Actúa como un asistente experto en tecnología de los alimentos. Un usuario está aprendiendo a hacer "{name}" y tiene una pregunta.
Explica el siguiente término o responde la siguiente pregunta de manera sencilla, clara y concisa en español de Latinoamérica.
Pregunta del usuario: "{query}""#,
        name = preserve_name,
        query = query,
    )
}

/// Greeting shown when the chat panel opens
pub fn chat_greeting(preserve_name: &str) -> String {
    format!(
        "¡Hola! Soy tu asistente. ¿Tienes alguna pregunta sobre cómo hacer {}?",
        preserve_name
    )
}
