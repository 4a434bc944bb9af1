use std::collections::VecDeque;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use crawl_core::{update, AppState, AppViewModel, FormInput, Msg};
use crawl_engine::ClientSettings;
use crawl_logging::{crawl_info, crawl_warn};

use super::args::Args;
use super::effects::EffectRunner;
use super::form_file::load_form;
use super::ui;
use super::ui::render::{DownloadLinks, TextRenderer};

pub fn run_app() -> anyhow::Result<()> {
    let args = Args::parse();
    crawl_logging::initialize(args.log_destination(), args.log_level());
    crawl_info!("Console starting against {}", args.server);

    let settings = ClientSettings::with_base_url(args.server.clone());
    let runner = EffectRunner::new(&settings, args.download_dir.clone())?;
    let mut console = Console::new(runner, DownloadLinks::new(&args.server), args.download);

    for line in ui::layout::banner() {
        println!("{line}");
    }

    let today = Local::now().date_naive();
    let form = match &args.form {
        Some(path) => load_form(path)?,
        None => FormInput::for_today(today),
    };
    for msg in args.opening_msgs(form, today) {
        console.push(msg);
    }

    console.run()
}

/// Console binding: owns the state, feeds messages through `update` and prints what changed.
struct Console {
    state: AppState,
    runner: EffectRunner,
    links: DownloadLinks,
    renderer: TextRenderer,
    inbox: VecDeque<Msg>,
    auto_download: bool,
    result_download_requested: bool,
}

impl Console {
    fn new(runner: EffectRunner, links: DownloadLinks, auto_download: bool) -> Self {
        Self {
            state: AppState::new(),
            runner,
            links,
            renderer: TextRenderer::default(),
            inbox: VecDeque::new(),
            auto_download,
            result_download_requested: false,
        }
    }

    fn push(&mut self, msg: Msg) {
        self.inbox.push_back(msg);
    }

    /// Runs until nothing is in flight and no message is waiting.
    fn run(mut self) -> anyhow::Result<()> {
        let view = self.state.view();
        self.render(&view)?;
        loop {
            while let Some(msg) = self.inbox.pop_front() {
                self.dispatch_msg(msg)?;
            }
            if self.state.is_settled() {
                break;
            }
            let next = self
                .runner
                .next_msg(ui::constants::EVENT_WAIT)
                .context("Engine stopped before the crawl settled")?;
            if let Some(msg) = next {
                self.push(msg);
            }
        }
        crawl_info!("Console finished");
        Ok(())
    }

    fn dispatch_msg(&mut self, msg: Msg) -> anyhow::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        if was_dirty {
            let view = self.state.view();
            self.render(&view)?;
            if self.auto_download && wants_result_download(&view, self.result_download_requested)
            {
                self.result_download_requested = true;
                self.push(Msg::ResultDownloadClicked);
            }
        }

        for effect in effects {
            if let Some(notice) = self.runner.run(effect) {
                crawl_warn!("Notice: {}", notice);
                eprintln!("! {notice}");
            }
        }
        Ok(())
    }

    fn render(&mut self, view: &AppViewModel) -> anyhow::Result<()> {
        Ok(self.renderer.draw(ui::render::render(view, &self.links))?)
    }
}

/// The result panel offers a file and it has not been fetched yet.
fn wants_result_download(view: &AppViewModel, already_requested: bool) -> bool {
    !already_requested && view.result.as_ref().is_some_and(|r| r.download.is_some())
}
