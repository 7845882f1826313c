//! Todo Demos entry point
//!
//! On the web: wires the todo list and the counter/form demo to the DOM.
//! Natively: a small CLI over the same todo store, persisted to files.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, Event, EventTarget, HtmlInputElement, KeyboardEvent};

    use todo_demos::demo::{Counter, GRID_CELLS, GuestForm, grid_labels};
    use todo_demos::platform::LocalStorage;
    use todo_demos::{Filter, KeyValueStore, MemoryStorage, Settings, StorageError, TodoStore};

    /// LocalStorage when the browser allows it, an in-memory map otherwise
    enum AppStorage {
        Local(LocalStorage),
        Memory(MemoryStorage),
    }

    impl AppStorage {
        fn open() -> Self {
            match LocalStorage::open() {
                Ok(storage) => AppStorage::Local(storage),
                Err(e) => {
                    log::warn!("{e}; changes will not survive a reload");
                    AppStorage::Memory(MemoryStorage::new())
                }
            }
        }
    }

    impl KeyValueStore for AppStorage {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            match self {
                AppStorage::Local(s) => s.read(key),
                AppStorage::Memory(s) => s.read(key),
            }
        }

        fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
            match self {
                AppStorage::Local(s) => s.write(key, value),
                AppStorage::Memory(s) => s.write(key, value),
            }
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            match self {
                AppStorage::Local(s) => s.remove(key),
                AppStorage::Memory(s) => s.remove(key),
            }
        }
    }

    /// UI state: the todo store plus the scaffold demo
    struct App {
        todos: TodoStore<AppStorage>,
        counter: Counter,
        guest: GuestForm,
    }

    fn page_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn input_by_id(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    /// Attach `handler` for `event` and leak the closure (lives as long as the page)
    fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Element under the event and the id of the todo row containing it
    fn event_row(event: &Event) -> Option<(Element, u32)> {
        let target: Element = event.target()?.dyn_into().ok()?;
        let row = target.closest("li[data-id]").ok()??;
        let id = row.get_attribute("data-id")?.parse().ok()?;
        Some((target, id))
    }

    fn render_todos(app: &App, document: &Document) {
        let Some(list) = document.get_element_by_id("todo-list") else {
            return;
        };
        list.set_inner_html("");

        for item in app.todos.visible() {
            let Ok(row) = document.create_element("li") else {
                continue;
            };
            let _ = row.set_attribute("data-id", &item.id.to_string());
            if item.completed {
                row.set_class_name("completed");
            }

            if let Some(toggle) = document
                .create_element("input")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            {
                toggle.set_type("checkbox");
                toggle.set_class_name("toggle");
                toggle.set_checked(item.completed);
                let _ = toggle.set_attribute("data-action", "toggle");
                let _ = row.append_child(&toggle);
            }

            if let Ok(label) = document.create_element("label") {
                label.set_text_content(Some(&item.description));
                let _ = label.set_attribute("data-action", "edit");
                let _ = row.append_child(&label);
            }

            if let Ok(delete) = document.create_element("button") {
                delete.set_class_name("destroy");
                delete.set_text_content(Some("×"));
                let _ = delete.set_attribute("data-action", "delete");
                let _ = row.append_child(&delete);
            }

            let _ = list.append_child(&row);
        }

        if let Some(count) = document.get_element_by_id("todo-count") {
            let left = app.todos.active_count();
            let noun = if left == 1 { "item" } else { "items" };
            count.set_text_content(Some(&format!("{left} {noun} left")));
        }

        if let Some(toggle_all) = input_by_id(document, "toggle-all") {
            toggle_all.set_checked(!app.todos.is_empty() && app.todos.all_completed());
        }

        for filter in Filter::ALL {
            let id = format!("filter-{}", filter.as_str());
            if let Some(button) = document.get_element_by_id(&id) {
                let class = if app.todos.filter() == filter {
                    "selected"
                } else {
                    ""
                };
                button.set_class_name(class);
            }
        }

        if let Some(clear) = document.get_element_by_id("clear-completed") {
            let hidden = app.todos.completed_count() == 0;
            let _ = clear.toggle_attribute_with_force("hidden", hidden);
        }
    }

    fn render_demo(app: &App, document: &Document) {
        if let Some(heading) = document.get_element_by_id("counter-heading") {
            heading.set_text_content(Some(&app.counter.heading()));
        }
        if let Some(greeting) = document.get_element_by_id("greeting") {
            greeting.set_text_content(Some(&app.guest.greeting()));
        }
    }

    fn build_grid(document: &Document) {
        let Some(grid) = document.get_element_by_id("grid") else {
            return;
        };
        for label in grid_labels(GRID_CELLS) {
            if let Ok(cell) = document.create_element("div") {
                cell.set_class_name("grid-cell");
                cell.set_text_content(Some(&label));
                let _ = grid.append_child(&cell);
            }
        }
    }

    fn setup_todo_handlers(app: Rc<RefCell<App>>, document: &Document) {
        // New todo on Enter
        if let Some(input) = input_by_id(document, "new-todo") {
            let app = app.clone();
            let field = input.clone();
            listen(&input, "keydown", move |event: Event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if key.key() != "Enter" {
                    return;
                }
                let mut a = app.borrow_mut();
                if a.todos.add(&field.value()).is_some() {
                    field.set_value("");
                }
                if let Some(doc) = page_document() {
                    render_todos(&a, &doc);
                }
            });
        }

        // Row actions: toggle / delete via click, edit via double click
        if let Some(list) = document.get_element_by_id("todo-list") {
            let app_click = app.clone();
            listen(&list, "click", move |event: Event| {
                let Some((target, id)) = event_row(&event) else {
                    return;
                };
                let mut a = app_click.borrow_mut();
                match target.get_attribute("data-action").as_deref() {
                    Some("toggle") => a.todos.toggle_one(id),
                    Some("delete") => a.todos.delete(id),
                    _ => return,
                }
                if let Some(doc) = page_document() {
                    render_todos(&a, &doc);
                }
            });

            let app_edit = app.clone();
            listen(&list, "dblclick", move |event: Event| {
                let Some((target, id)) = event_row(&event) else {
                    return;
                };
                if target.get_attribute("data-action").as_deref() != Some("edit") {
                    return;
                }
                let mut a = app_edit.borrow_mut();
                let Some(current) = a.todos.get(id).map(|item| item.description.clone()) else {
                    return;
                };
                let edited = web_sys::window()
                    .and_then(|w| w.prompt_with_message_and_default("Edit todo", &current).ok())
                    .flatten();
                if let Some(text) = edited {
                    a.todos.edit(id, &text);
                }
                if let Some(doc) = page_document() {
                    render_todos(&a, &doc);
                }
            });
        }

        if let Some(toggle_all) = document.get_element_by_id("toggle-all") {
            let app = app.clone();
            listen(&toggle_all, "click", move |_| {
                let mut a = app.borrow_mut();
                a.todos.toggle_all();
                if let Some(doc) = page_document() {
                    render_todos(&a, &doc);
                }
            });
        }

        if let Some(clear) = document.get_element_by_id("clear-completed") {
            let app = app.clone();
            listen(&clear, "click", move |_| {
                let mut a = app.borrow_mut();
                a.todos.clear_completed();
                if let Some(doc) = page_document() {
                    render_todos(&a, &doc);
                }
            });
        }

        for filter in Filter::ALL {
            let Some(button) = document.get_element_by_id(&format!("filter-{}", filter.as_str()))
            else {
                continue;
            };
            button.set_text_content(Some(filter.label()));
            let app = app.clone();
            listen(&button, "click", move |_| {
                let mut a = app.borrow_mut();
                a.todos.set_filter(filter);
                if let Some(doc) = page_document() {
                    render_todos(&a, &doc);
                }
            });
        }
    }

    fn setup_demo_handlers(app: Rc<RefCell<App>>, document: &Document, tick_ms: u32) {
        // Counter tick
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                let mut a = app.borrow_mut();
                a.counter.tick();
                if let Some(doc) = page_document() {
                    render_demo(&a, &doc);
                }
            });
            if let Some(window) = web_sys::window() {
                let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    tick_ms as i32,
                );
            }
            closure.forget();
        }

        let name_input = input_by_id(document, "guest-name");

        let form = document.get_element_by_id("guest-form");
        if let (Some(form), Some(input)) = (form, name_input.clone()) {
            let app = app.clone();
            listen(&form, "submit", move |event: Event| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                a.guest.submit(&input.value());
                log::info!("Guest: {}", a.guest.guest());
                if let Some(doc) = page_document() {
                    render_demo(&a, &doc);
                }
            });
        }

        let reset = document.get_element_by_id("guest-reset");
        if let (Some(reset), Some(input)) = (reset, name_input) {
            listen(&reset, "click", move |_| {
                input.set_value("");
                let mut a = app.borrow_mut();
                a.guest.reset();
                if let Some(doc) = page_document() {
                    render_demo(&a, &doc);
                }
            });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Todo Demos starting...");

        let document = page_document().expect("no document");

        let storage = AppStorage::open();
        let settings = Settings::load(&storage);
        let mut todos = TodoStore::open(storage, settings.storage_key.clone());
        todos.set_filter(settings.initial_filter);

        let app = Rc::new(RefCell::new(App {
            todos,
            counter: Counter::new(),
            guest: GuestForm::new(),
        }));

        build_grid(&document);
        setup_todo_handlers(app.clone(), &document);
        setup_demo_handlers(app.clone(), &document, settings.tick_interval_ms());

        {
            let a = app.borrow();
            render_todos(&a, &document);
            render_demo(&a, &document);
        }

        log::info!("Todo Demos running!");
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use clap::{Parser, Subcommand};

    use todo_demos::consts::{APP_DIR_NAME, FALLBACK_DATA_DIR};
    use todo_demos::demo::greeting;
    use todo_demos::platform::FileStorage;
    use todo_demos::{Filter, KeyValueStore, Settings, TodoStore};

    #[derive(Parser, Debug)]
    #[command(name = "todo-demos")]
    #[command(about = "A todo list persisted to a local key-value slot")]
    #[command(version)]
    pub struct Cli {
        /// Directory holding the storage slots
        #[arg(long, global = true)]
        pub data_dir: Option<PathBuf>,

        /// Slot key for the todo list (overrides settings)
        #[arg(long, global = true)]
        pub key: Option<String>,

        /// Log at info level (RUST_LOG still wins)
        #[arg(short, long, global = true)]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Subcommand, Debug)]
    pub enum Command {
        #[command(flatten)]
        Todo(TodoCommand),
        /// Print the demo greeting
        Greet { name: Option<String> },
        /// Show or change persisted settings
        Config {
            /// Filter used by `list` when none is given
            #[arg(long, value_parser = parse_filter)]
            filter: Option<Filter>,
            /// Demo counter interval in milliseconds
            #[arg(long)]
            tick_ms: Option<u32>,
            /// Forget saved settings before applying any others
            #[arg(long)]
            reset: bool,
        },
    }

    #[derive(Subcommand, Debug)]
    pub enum TodoCommand {
        /// Add a todo
        Add {
            #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
            description: Vec<String>,
        },
        /// Change a todo's description
        Edit {
            id: u32,
            #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
            description: Vec<String>,
        },
        /// Flip a todo between active and completed
        Toggle { id: u32 },
        /// Complete everything, or reopen everything if all are complete
        ToggleAll,
        /// Remove a todo
        Delete { id: u32 },
        /// Remove every completed todo
        ClearCompleted,
        /// Show todos
        List {
            #[arg(value_parser = parse_filter)]
            filter: Option<Filter>,
        },
    }

    fn parse_filter(s: &str) -> Result<Filter, String> {
        Filter::from_str(s).ok_or_else(|| format!("unknown filter `{s}` (all, active, completed)"))
    }

    fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
    }

    fn print_list<S: KeyValueStore>(store: &TodoStore<S>, filter: Filter) {
        for item in store.view(filter) {
            let mark = if item.completed { "x" } else { " " };
            println!("[{mark}] {:>3}  {}", item.id, item.description);
        }
        let left = store.active_count();
        let noun = if left == 1 { "item" } else { "items" };
        println!("{left} {noun} left ({filter})");
    }

    fn run_todo<S: KeyValueStore>(
        store: &mut TodoStore<S>,
        command: TodoCommand,
        default_filter: Filter,
    ) {
        match command {
            TodoCommand::Add { description } => match store.add(&description.join(" ")) {
                Some(id) => println!("Added #{id}"),
                None => println!("Nothing to add"),
            },
            TodoCommand::Edit { id, description } => {
                let before = store.get(id).cloned();
                store.edit(id, &description.join(" "));
                if store.get(id) == before.as_ref() {
                    println!("No change");
                } else {
                    println!("Edited #{id}");
                }
            }
            TodoCommand::Toggle { id } => {
                store.toggle_one(id);
                match store.get(id) {
                    Some(item) if item.completed => println!("Completed #{id}"),
                    Some(_) => println!("Reopened #{id}"),
                    None => println!("No todo #{id}"),
                }
            }
            TodoCommand::ToggleAll => {
                store.toggle_all();
                println!("{} of {} completed", store.completed_count(), store.len());
            }
            TodoCommand::Delete { id } => {
                let before = store.len();
                store.delete(id);
                if store.len() < before {
                    println!("Deleted #{id}");
                } else {
                    println!("No todo #{id}");
                }
            }
            TodoCommand::ClearCompleted => {
                let before = store.len();
                store.clear_completed();
                println!("Cleared {}", before - store.len());
            }
            TodoCommand::List { filter } => print_list(store, filter.unwrap_or(default_filter)),
        }
    }

    pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
        let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
        let storage = FileStorage::open(&data_dir)?;
        log::info!("Using data dir {}", storage.dir().display());

        let mut settings = Settings::load(&storage);

        match cli.command {
            Command::Todo(command) => {
                let key = cli.key.unwrap_or_else(|| settings.storage_key.clone());
                let mut store = TodoStore::open(&storage, key);
                log::info!("Todo list slot {}", store.key());
                run_todo(&mut store, command, settings.initial_filter);
            }
            Command::Greet { name } => println!("{}", greeting(name.as_deref().unwrap_or(""))),
            Command::Config {
                filter,
                tick_ms,
                reset,
            } => {
                if reset {
                    Settings::reset(&storage);
                    settings = Settings::default();
                }
                if let Some(filter) = filter {
                    settings.initial_filter = filter;
                }
                if let Some(ms) = tick_ms {
                    settings.set_tick_interval(ms);
                }
                if filter.is_some() || tick_ms.is_some() {
                    settings.save(&storage);
                }
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use clap::Parser;

    let cli = cli::Cli::parse();
    let level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    log::info!("Todo Demos (native) starting...");

    cli::run(cli)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
