//! Interactive terminal front end: screen rendering and the command loop

use crate::gemini::GeminiClient;
use crate::models::{AppMode, Category, ChatTurn, FlowchartStep, Sender, StepShape};
use crate::pdf;
use crate::prompts::{self, LOADING_MESSAGES};
use crate::state::{Screen, ViewState};
use log::{error, info};
use std::io::Write as IoWrite;
use std::time::Duration;

const SCHOOL_NAME: &str = "Escuela 4-188 Padre Eduardo Sergio Iácono";
const SCHOOL_PROGRAM: &str = "Técnica en Tecnología de los Alimentos";

/// Top-level application context: the static catalog, the AI client and
/// the single writable view state.
pub struct App {
    catalog: Vec<Category>,
    client: GeminiClient,
    state: ViewState,
}

impl App {
    pub fn new(catalog: Vec<Category>, client: GeminiClient) -> Self {
        Self {
            catalog,
            client,
            state: ViewState::new(),
        }
    }
}

/// Runs the interactive session until the user quits or stdin closes
pub async fn run(app: &mut App) {
    loop {
        render(app);
        let Some(line) = read_line() else { break };
        if !dispatch(app, line.trim()).await {
            break;
        }
    }
    println!("¡Hasta pronto!");
}

// ============ Input Handling ============

/// Reads one line from stdin; None on EOF
fn read_line() -> Option<String> {
    let mut line = String::new();
    match std::io::stdin().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(e) => {
            error!("[input] failed to read stdin: {}", e);
            None
        }
    }
}

/// Parses a 1-based menu selection against a list length
fn parse_index(input: &str, len: usize) -> Option<usize> {
    input
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
        .map(|n| n - 1)
}

/// Applies one line of input. Returns false when the session should end.
async fn dispatch(app: &mut App, input: &str) -> bool {
    // An open step overlay swallows the next input line
    if app.state.screen() == Screen::Detail && app.state.active_step().is_some() {
        app.state.close_step();
        return true;
    }
    if input.is_empty() {
        return true;
    }

    match app.state.screen() {
        Screen::ModeSelect => match input {
            "1" => {
                app.state.select_mode(AppMode::Profesional);
            }
            "2" => {
                app.state.select_mode(AppMode::Principiante);
            }
            "salir" | "q" => return false,
            _ => println!("Opción no reconocida. Elige 1, 2 o escribe 'salir'."),
        },
        Screen::Categories => match input {
            "salir" | "q" => return false,
            "modo" => app.state.change_mode(),
            _ => match parse_index(input, app.catalog.len()) {
                Some(index) => {
                    let category = app.catalog[index].clone();
                    app.state.select_category(category);
                }
                None => println!("Opción no reconocida. Elige un número de la lista."),
            },
        },
        Screen::Preserves => match input {
            "salir" | "q" => return false,
            "modo" => app.state.change_mode(),
            "volver" => {
                app.state.back();
            }
            _ => {
                let selected = app
                    .state
                    .selected_category()
                    .and_then(|category| {
                        parse_index(input, category.preserves.len())
                            .map(|index| category.preserves[index].clone())
                    });
                match selected {
                    Some(preserve) => {
                        if app.state.select_preserve(preserve) {
                            load_content(app).await;
                        }
                    }
                    None => println!("Opción no reconocida. Elige un número de la lista."),
                }
            }
        },
        Screen::Detail if app.state.chat_open() => match input {
            "/cerrar" => app.state.close_chat(),
            _ if input.starts_with('/') => {
                println!("Comando no reconocido. Usa /cerrar para volver a la guía.")
            }
            _ => send_chat_message(app, input).await,
        },
        Screen::Detail => match input {
            "salir" | "q" => return false,
            "modo" => app.state.change_mode(),
            "volver" => {
                app.state.back();
            }
            "chat" => {
                app.state.open_chat();
            }
            "pdf" => run_export(app).await,
            "reintentar" => {
                if app.state.retry() {
                    load_content(app).await;
                }
            }
            _ => match input.parse::<u32>() {
                Ok(id) => {
                    if !app.state.open_step(id) {
                        println!("No hay una etapa con ese número.");
                    }
                }
                Err(_) => println!(
                    "Comando no reconocido. Escribe el número de una etapa, 'chat', 'pdf', 'volver', 'modo' o 'salir'."
                ),
            },
        },
    }
    true
}

// ============ Remote Actions ============

/// Fetches content for the just-selected recipe, rotating status lines
/// until the request resolves
async fn load_content(app: &mut App) {
    let (name, mode) = match (app.state.selected_preserve(), app.state.mode()) {
        (Some(preserve), Some(mode)) => (preserve.name.clone(), mode),
        _ => return,
    };

    let ticker = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(2));
        let mut index = 0usize;
        loop {
            interval.tick().await;
            println!("  {}", LOADING_MESSAGES[index % LOADING_MESSAGES.len()]);
            index += 1;
        }
    });

    let result = app.client.fetch_preserve_details(&name, mode).await;
    ticker.abort();

    match result {
        Ok(content) => {
            info!("[content] loaded '{}' ({})", name, mode.label());
            app.state.content_loaded(content);
        }
        Err(e) => {
            error!("[content] {}", e.cause());
            app.state.content_failed(e.to_string());
        }
    }
}

async fn send_chat_message(app: &mut App, query: &str) {
    let name = match app.state.selected_preserve() {
        Some(preserve) => preserve.name.clone(),
        None => return,
    };
    if !app.state.push_chat_turn(Sender::User, query.to_string()) {
        return;
    }
    println!("  El asistente está escribiendo...");

    let reply = match app.client.fetch_chat_reply(query, &name).await {
        Ok(text) => text,
        Err(e) => {
            error!("[chat] {}", e.cause());
            prompts::CHAT_APOLOGY.to_string()
        }
    };
    app.state.push_chat_turn(Sender::Assistant, reply);
}

async fn run_export(app: &mut App) {
    if !app.state.begin_export() {
        if app.state.is_exporting() {
            println!("Ya hay una exportación en curso.");
        } else {
            println!("Todavía no hay una guía cargada para exportar.");
        }
        return;
    }
    let preserve = app.state.selected_preserve().cloned();
    let content = app.state.content().cloned();
    let mode = app.state.mode();
    let (preserve, content, mode) = match (preserve, content, mode) {
        (Some(preserve), Some(content), Some(mode)) => (preserve, content, mode),
        _ => {
            app.state.finish_export();
            return;
        }
    };

    println!("Generando...");
    match pdf::export_guide(&preserve, &content, mode).await {
        Ok(path) => println!("Guía guardada en {}", path.display()),
        Err(e) => {
            error!("[export] {}", e.cause());
            println!("{}", e);
        }
    }
    app.state.finish_export();
}

// ============ Rendering ============

fn render(app: &App) {
    match app.state.screen() {
        Screen::ModeSelect => render_mode_select(),
        Screen::Categories => render_categories(&app.catalog),
        Screen::Preserves => {
            if let Some(category) = app.state.selected_category() {
                render_preserves(category);
            }
        }
        Screen::Detail => render_detail(app),
    }
}

fn prompt(hint: &str) {
    println!();
    println!("{}", hint);
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn school_footer() {
    println!();
    println!("{}", SCHOOL_NAME);
    println!("{}", SCHOOL_PROGRAM);
}

fn render_mode_select() {
    println!();
    println!("==================================================");
    println!("          Bienvenido a Hecho por Mi");
    println!("==================================================");
    println!("Para empezar, elige el modo que mejor se adapte a tus conocimientos.");
    println!();
    println!("  1. Modo Profesional");
    println!("     Para estudiantes y profesionales del sector alimentario.");
    println!("     Contenido con terminología técnica y enfoque científico.");
    println!();
    println!("  2. Modo Principiante");
    println!("     Para familias, emprendedores y entusiastas de la cocina.");
    println!("     Guías paso a paso con un lenguaje claro y sencillo.");
    school_footer();
    prompt("Elige una opción (1/2) o escribe 'salir':");
}

fn render_categories(catalog: &[Category]) {
    println!();
    println!("=== Hecho por Mi ===");
    println!("Tu guía para crear conservas caseras deliciosas y seguras.");
    println!("Elige una categoría para explorar las recetas.");
    println!();
    for (index, category) in catalog.iter().enumerate() {
        println!(
            "  {}. {} ({} recetas)",
            index + 1,
            category.name,
            category.preserves.len()
        );
    }
    school_footer();
    prompt("Elige una categoría (número), 'modo' para cambiar de modo o 'salir':");
}

fn render_preserves(category: &Category) {
    println!();
    println!("=== {} ===", category.name);
    println!("Elige una receta para comenzar.");
    println!();
    for (index, preserve) in category.preserves.iter().enumerate() {
        println!("  {}. {}", index + 1, preserve.name);
    }
    prompt("Elige una receta (número), 'volver', 'modo' o 'salir':");
}

fn render_detail(app: &App) {
    let Some(preserve) = app.state.selected_preserve() else {
        return;
    };
    if let Some(step) = app.state.active_step() {
        render_step_detail(step);
        return;
    }
    if app.state.chat_open() {
        render_chat(app.state.chat_log());
        return;
    }

    println!();
    println!("=== {} ===", preserve.name);

    if let Some(message) = app.state.error() {
        println!();
        println!("  {}", message);
        prompt("Escribe 'reintentar', 'volver', 'modo' o 'salir':");
        return;
    }
    let Some(content) = app.state.content() else {
        if app.state.is_loading() {
            println!("  Cargando...");
        }
        prompt("Escribe 'volver', 'modo' o 'salir':");
        return;
    };

    println!();
    println!("--- Definición del Producto ---");
    println!("{}", content.definition);

    println!();
    println!("--- Proceso de Elaboración ---");
    println!("Escribe el número de una etapa para ver los detalles.");
    println!();
    print!("{}", flowchart_text(&content.process));

    if let Some(points) = &preserve.critical_points {
        println!();
        println!("--- Puntos Críticos de Control ---");
        if let Some(ph) = &points.ph {
            println!("  pH Objetivo: {}", ph);
        }
        if let Some(brix) = &points.brix {
            println!("  Brix Objetivo: {}", brix);
        }
    }

    println!();
    println!("--- Video Tutoriales ---");
    println!(
        "  https://www.youtube.com/playlist?list={}",
        content.youtube_playlist_id
    );

    println!();
    println!("--- Esterilización ---");
    println!("¡Atención! El correcto cumplimiento de los tiempos de esterilización");
    println!("es crucial para eliminar la carga microbiana y garantizar la inocuidad");
    println!("del producto final.");
    println!();
    for item in &preserve.sterilization_times {
        println!("  {:<26} {:>3} min", item.name, item.minutes);
    }

    println!();
    println!("--- Más Información ---");
    println!("Para garantizar la máxima seguridad, se aconseja verificar los Puntos");
    println!("Críticos de Control. Puedes realizar una medición precisa de pH o");
    println!("grados Brix en nuestro establecimiento:");
    println!("  https://maps.app.goo.gl/66CjQkvAAtGXTgLo6");
    println!("Alternativamente, para una estimación del pH desde casa, recomendamos");
    println!("utilizar la app Moracol, que ofrece una mayor precisión que las tiras");
    println!("reactivas:");
    println!("  https://play.google.com/store/apps/details?id=com.moracol.app");

    prompt("Etapa (número), 'chat', 'pdf' (descargar guía), 'volver', 'modo' o 'salir':");
}

fn render_step_detail(step: &FlowchartStep) {
    println!();
    println!("--- {}. {} ---", step.id, step.title);
    println!("{}", step.description);
    prompt("Pulsa Enter para volver a la guía.");
}

fn render_chat(log: &[ChatTurn]) {
    println!();
    println!("=== Asistente de IA ===");
    for turn in log {
        match turn.sender {
            Sender::User => println!("  Tú: {}", turn.text),
            Sender::Assistant => println!("  Asistente: {}", turn.text),
        }
    }
    prompt("Escribe tu pregunta o '/cerrar' para volver a la guía:");
}

/// Renders the process as a vertical text flowchart. Start and end
/// markers keep their rounded form, decisions are angled.
fn flowchart_text(steps: &[FlowchartStep]) -> String {
    let mut out = String::new();
    for (index, step) in steps.iter().enumerate() {
        let label = format!("{}. {}", step.id, step.title);
        let node = match step.shape {
            StepShape::Terminator | StepShape::Oval => format!("( {} )", label),
            StepShape::Rectangle => format!("[ {} ]", label),
            StepShape::Diamond => format!("< {} >", label),
        };
        out.push_str("      ");
        out.push_str(&node);
        out.push('\n');
        if index + 1 < steps.len() {
            out.push_str("         |\n         v\n");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: u32, title: &str, shape: StepShape) -> FlowchartStep {
        FlowchartStep {
            id,
            title: title.to_string(),
            description: String::new(),
            shape,
        }
    }

    #[test]
    fn test_parse_index_bounds() {
        assert_eq!(parse_index("1", 3), Some(0));
        assert_eq!(parse_index("3", 3), Some(2));
        assert_eq!(parse_index("0", 3), None);
        assert_eq!(parse_index("4", 3), None);
        assert_eq!(parse_index("x", 3), None);
        assert_eq!(parse_index("2", 0), None);
    }

    #[test]
    fn test_flowchart_shapes() {
        let steps = vec![
            step(1, "Inicio", StepShape::Terminator),
            step(2, "Cocinar", StepShape::Rectangle),
            step(3, "¿pH correcto?", StepShape::Diamond),
            step(4, "Fin", StepShape::Oval),
        ];
        let chart = flowchart_text(&steps);
        assert!(chart.contains("( 1. Inicio )"));
        assert!(chart.contains("[ 2. Cocinar ]"));
        assert!(chart.contains("< 3. ¿pH correcto? >"));
        assert!(chart.contains("( 4. Fin )"));
        // connectors only between nodes
        assert_eq!(chart.matches("|\n").count(), 3);
        assert!(!chart.trim_end().ends_with('v'));
    }

    #[test]
    fn test_flowchart_single_step_has_no_connector() {
        let chart = flowchart_text(&[step(1, "Inicio", StepShape::Terminator)]);
        assert!(chart.contains("( 1. Inicio )"));
        assert!(!chart.contains('|'));
    }
}
