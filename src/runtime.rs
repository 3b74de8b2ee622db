//! Application state and the top-level run loop.
//!
//! `AppState` owns every screen, the alarm plan, the operator settings, and
//! the activity logger — there is no process-wide mutable state. The run
//! loop is cooperative: one refresh per tick, dispatch when a selection is
//! submitted. Dispatch itself is thin glue; the interesting behavior lives
//! in the menu engine and the alarm subsystem.

use std::path::Path;

use crate::alarm::monitor::{AlarmMonitor, MonitorOutcome};
use crate::alarm::setup::{self, AlarmPlan};
use crate::core::config::Config;
use crate::core::errors::Result;
use crate::core::settings::SettingsFile;
use crate::logger::jsonl::{EventType, JsonlLogger, LogEntry, Severity};
use crate::menu::engine::{MenuEngine, PanelRenderer};
use crate::menu::prompt;
use crate::menu::template::{MenuTemplate, ScreenLayout};
use crate::menu::templates;
use crate::platform::console::Console;
use crate::platform::robot::Robot;

/// Settings key the rover's name persists under.
const NAME_KEY: &str = "roverName";

// ──────────────────── screens ────────────────────

/// Screen indices into the menu list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScreenId {
    Main = 0,
    Connect = 1,
    Alarm = 2,
}

impl ScreenId {
    const fn index(self) -> usize {
        self as usize
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Connect => "connect",
            Self::Alarm => "alarm",
        }
    }
}

/// Resolve a screen template: a file of the given name in the template
/// directory wins, otherwise the built-in screen is used.
fn load_screen(dir: &Path, file: &str, builtin: &str) -> MenuTemplate {
    let path = dir.join(file);
    if path.exists()
        && let Ok(template) = MenuTemplate::load(&path)
    {
        return template;
    }
    MenuTemplate::parse(builtin)
}

/// One-line alarm summary drawn above the output region on the alarm screen.
struct SummaryPanel {
    line: String,
}

impl SummaryPanel {
    fn for_plan(plan: &AlarmPlan) -> Self {
        Self {
            line: format!(
                "Sensor: {} | {} {} | {} low / {} high alerts",
                plan.sensor.label(),
                plan.duration,
                plan.unit.label().to_lowercase(),
                plan.store.low().len(),
                plan.store.high().len(),
            ),
        }
    }
}

impl PanelRenderer for SummaryPanel {
    fn render(&mut self, console: &mut dyn Console, layout: &ScreenLayout) {
        let width = usize::from(layout.console_width).saturating_sub(4);
        let mut line: String = self.line.chars().take(width).collect();
        while line.chars().count() < width {
            line.push(' ');
        }
        console.set_cursor(2, layout.output_top.saturating_sub(1));
        console.write(&line);
    }
}

// ──────────────────── app state ────────────────────

/// Everything the run loop owns.
pub struct AppState {
    config: Config,
    settings: SettingsFile,
    logger: JsonlLogger,
    menus: Vec<MenuEngine>,
    current: ScreenId,
    plan: AlarmPlan,
    rover_name: String,
    connected: bool,
    running: bool,
}

impl AppState {
    /// Build the application from its configuration.
    pub fn new(config: Config) -> Result<Self> {
        let settings = SettingsFile::open(&config.paths.settings_file)?;
        let logger = JsonlLogger::new(&config.paths.jsonl_log);

        let dir = &config.paths.template_dir;
        let menus = vec![
            MenuEngine::from_template(load_screen(dir, "main_menu.txt", templates::MAIN_MENU)),
            MenuEngine::from_template(load_screen(
                dir,
                "connect_menu.txt",
                templates::CONNECT_MENU,
            )),
            MenuEngine::from_template(load_screen(dir, "alarm_menu.txt", templates::ALARM_MENU)),
        ];

        let plan = AlarmPlan::from_config(&config.alarm);
        let rover_name = settings.get(NAME_KEY).unwrap_or_default().to_string();

        let mut app = Self {
            config,
            settings,
            logger,
            menus,
            current: ScreenId::Main,
            plan,
            rover_name,
            connected: false,
            running: true,
        };
        app.refresh_alarm_panel();
        Ok(app)
    }

    /// Keep the alarm screen's summary panel in sync with the plan.
    fn refresh_alarm_panel(&mut self) {
        let panel = SummaryPanel::for_plan(&self.plan);
        self.menus[ScreenId::Alarm.index()].set_panel(Some(Box::new(panel)));
    }

    /// The rover's persisted name, if one was ever chosen.
    #[must_use]
    pub fn rover_name(&self) -> &str {
        &self.rover_name
    }

    /// Whether the connection handshake has succeeded this session.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The current alarm configuration.
    #[must_use]
    pub fn plan(&self) -> &AlarmPlan {
        &self.plan
    }

    /// Run the console until the operator quits.
    pub fn run(&mut self, console: &mut dyn Console, robot: &mut dyn Robot) -> Result<()> {
        self.switch(console, ScreenId::Main);

        while self.running {
            let idx = self.current.index();
            self.menus[idx].refresh(console, false);
            if self.menus[idx].enter_pressed() {
                self.dispatch(console, robot);
            }
        }
        Ok(())
    }

    // ──────────────────── dispatch ────────────────────

    fn dispatch(&mut self, console: &mut dyn Console, robot: &mut dyn Robot) {
        let selected = self.menus[self.current.index()].selected_option().to_string();
        match selected.as_str() {
            "connectMenu" => self.switch(console, ScreenId::Connect),
            "alarmMenu" => self.switch(console, ScreenId::Alarm),
            "returnMain" => self.switch(console, ScreenId::Main),
            "connect" => self.connect_flow(console, robot),
            "configureAlarm" => self.configure_alarm(console),
            "startAlarm" => self.start_alarm(console, robot),
            "quit" => self.quit_flow(console, robot),
            _ => self.menu_error(console, "Invalid selection, Press any key to continue..."),
        }
    }

    fn switch(&mut self, console: &mut dyn Console, screen: ScreenId) {
        self.current = screen;
        self.menus[screen.index()].refresh(console, true);
        self.logger.append(
            &LogEntry::new(EventType::MenuLoaded, Severity::Info).with_screen(screen.name()),
        );
    }

    fn menu_error(&mut self, console: &mut dyn Console, error: &str) {
        let menu = &mut self.menus[self.current.index()];
        menu.clear(console);
        menu.write_line(console, error, false);
        prompt::wait_any_key(console);
    }

    // ──────────────────── connect ────────────────────

    fn connect_flow(&mut self, console: &mut dyn Console, robot: &mut dyn Robot) {
        let idx = self.current.index();

        let name = loop {
            let menu = &mut self.menus[idx];
            menu.clear(console);
            menu.write_line(
                console,
                "We are going to attempt to connect to your rover.",
                false,
            );
            menu.write(console, "\nWhat would you like to name it?  ");
            let name = menu.read_line(console);

            menu.clear(console);
            menu.write(console, &format!("Are you sure you want to name it {name}? "));
            let answer = menu.read_line(console);
            if answer.eq_ignore_ascii_case("yes") || answer.eq_ignore_ascii_case("y") {
                break name;
            }
        };

        let ok = robot.connect();
        self.logger.append(
            &LogEntry::new(EventType::ConnectAttempt, Severity::Info)
                .with_ok(ok)
                .with_details(name.clone()),
        );

        let menu = &mut self.menus[idx];
        if ok {
            menu.write_line(
                console,
                &format!("\n\nConnection to {name} was successful!"),
                false,
            );
            robot.set_led(0, 255, 0);
            self.connected = true;
            self.rover_name = name.clone();
            self.settings.set(NAME_KEY, &name);
            if let Err(err) = self.settings.save() {
                self.logger.append(
                    &LogEntry::new(EventType::Error, Severity::Warning)
                        .with_details(err.to_string()),
                );
            }
        } else {
            menu.clear(console);
            console.beep();
            menu.write_line(console, &format!("\n\nConnection to {name} Failed!"), false);
            menu.write_line(
                console,
                "Please make sure your rover is properly connected to your PC.",
                false,
            );
            menu.write_line(console, "\n\n Press any key to continue...", false);
            prompt::wait_any_key(console);
        }
    }

    // ──────────────────── alarm ────────────────────

    fn configure_alarm(&mut self, console: &mut dyn Console) {
        let menu = &mut self.menus[self.current.index()];
        let plan = setup::run_wizard(menu, console, &self.plan);
        self.logger.append(
            &LogEntry::new(EventType::ConfigSaved, Severity::Info).with_details(format!(
                "sensor={}, duration={} {}, {} low / {} high alerts",
                plan.sensor.label(),
                plan.duration,
                plan.unit.label().to_lowercase(),
                plan.store.low().len(),
                plan.store.high().len(),
            )),
        );
        self.plan = plan;
        self.refresh_alarm_panel();
    }

    fn start_alarm(&mut self, console: &mut dyn Console, robot: &mut dyn Robot) {
        if !self.connected {
            self.menu_error(
                console,
                "The rover is not connected. Connect it first. Press any key to continue...",
            );
            return;
        }
        if self.plan.store.is_empty() {
            self.menu_error(
                console,
                "No alarm thresholds configured. Configure the alarm first. \
                 Press any key to continue...",
            );
            return;
        }

        let mut monitor = AlarmMonitor::with_timing(
            self.plan.store.clone(),
            self.plan.sensor,
            self.plan.duration,
            self.plan.unit,
            &self.config.timing,
        );
        monitor.set_suppress_repeats(self.config.alarm.suppress_repeat_messages);

        let menu = &mut self.menus[self.current.index()];
        menu.clear(console);
        menu.write_line(
            console,
            &format!(
                "Alarm armed on the {} sensor for {} {}. Press Esc to stop.",
                self.plan.sensor.label().to_lowercase(),
                self.plan.duration,
                self.plan.unit.label().to_lowercase(),
            ),
            false,
        );

        let outcome = monitor.run(robot, menu, console, Some(&mut self.logger));

        let message = match outcome {
            MonitorOutcome::Cancelled => "Alarm stopped by operator.",
            MonitorOutcome::Expired => "Monitoring period complete.",
        };
        menu.write_line(console, message, false);
    }

    // ──────────────────── quit ────────────────────

    fn quit_flow(&mut self, console: &mut dyn Console, robot: &mut dyn Robot) {
        if self.connected {
            let menu = &mut self.menus[self.current.index()];
            menu.clear(console);
            menu.write_line(
                console,
                &format!("Disconnecting {} from your computer.", self.rover_name),
                false,
            );
            menu.write_line(console, "\n\nPress any key to pull the plug...", false);
            prompt::wait_any_key(console);
            robot.disconnect();
            self.connected = false;
        }
        self.running = false;
    }
}
