//! The browser application: routes, navigation, and per-screen rendering.
//!
//! Four screens, mirroring the web front-end's routes: the character roster
//! (`/`), a character detail page (`/:id`), a name search (`/search`), and a
//! user/posts page. The roster and detail queries are eager (started on
//! entry and on every id change); search and user are lazy (started when the
//! user submits).

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::api::{Api, CharacterData, CharacterListData, SearchData, UserData};
use crate::application::Application;
use crate::command::{Action, Command};
use crate::query::{Completion, QueryHandle};
use crate::subscription::Subscription;
use crate::subscription::terminal::TerminalEvents;
use crate::view::{
    FAILED_MESSAGE, LOADING_MESSAGE, NO_RESULTS_MESSAGE, Presentation, notice, present,
};

/// The active screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Roster,
    Detail { id: String },
    Search,
    User,
}

#[derive(Debug)]
pub enum Message {
    Terminal(Event),
    RosterFetched(Completion<CharacterListData>),
    DetailFetched(Completion<CharacterData>),
    SearchFetched(Completion<SearchData>),
    UserFetched(Completion<UserData>),
    Quit,
}

pub struct App {
    api: Api,
    route: Route,
    roster: QueryHandle<CharacterListData>,
    detail: QueryHandle<CharacterData>,
    search: QueryHandle<SearchData>,
    user: QueryHandle<UserData>,
    /// Cursor into the roster list.
    selected: usize,
    search_input: String,
    user_input: String,
}

impl Application for App {
    type Message = Message;
    type Flags = Api;

    fn new(api: Api) -> (Self, Command<Message>) {
        let mut app = Self {
            api,
            route: Route::Roster,
            roster: QueryHandle::new(),
            detail: QueryHandle::new(),
            search: QueryHandle::new(),
            user: QueryHandle::new(),
            selected: 0,
            search_input: String::new(),
            user_input: String::new(),
        };

        // The roster is eager: fetch as soon as the app is active.
        let cmd = app
            .roster
            .start(app.api.characters())
            .map(Message::RosterFetched);
        (app, cmd)
    }

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Terminal(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                self.handle_key(key)
            }
            Message::Terminal(_) => Command::none(),
            Message::RosterFetched(completion) => {
                self.roster.resolve(completion);
                self.clamp_selection();
                Command::none()
            }
            Message::DetailFetched(completion) => {
                self.detail.resolve(completion);
                Command::none()
            }
            Message::SearchFetched(completion) => {
                self.search.resolve(completion);
                Command::none()
            }
            Message::UserFetched(completion) => {
                self.user.resolve(completion);
                Command::none()
            }
            Message::Quit => Command::effect(Action::Quit),
        }
    }

    fn view(&self, frame: &mut Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(frame.area());

        match &self.route {
            Route::Roster => self.view_roster(frame, chunks[0]),
            Route::Detail { .. } => self.view_detail(frame, chunks[0]),
            Route::Search => self.view_search(frame, chunks[0]),
            Route::User => self.view_user(frame, chunks[0]),
        }

        let help = match self.route {
            Route::Roster => "↑/↓ select · Enter open · / search · u user · r refresh · q quit",
            // On the search screen every character is input, including 'q'.
            Route::Search => "type · Enter run · Esc back",
            Route::User => "type id · Enter run · Esc back · q quit",
            Route::Detail { .. } => "Esc back · q quit",
        };
        frame.render_widget(Line::from(help), chunks[1]);
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        vec![Subscription::new(TerminalEvents::new()).map(Message::Terminal)]
    }
}

impl App {
    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        match &self.route {
            Route::Roster => self.handle_roster_key(key),
            Route::Detail { .. } => self.handle_detail_key(key),
            Route::Search => self.handle_search_key(key),
            Route::User => self.handle_user_key(key),
        }
    }

    fn handle_roster_key(&mut self, key: KeyEvent) -> Command<Message> {
        match key.code {
            KeyCode::Char('q') => Command::message(Message::Quit),
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                Command::none()
            }
            KeyCode::Down => {
                self.selected += 1;
                self.clamp_selection();
                Command::none()
            }
            KeyCode::Enter => match self.selected_character_id() {
                Some(id) => self.open_detail(id),
                None => Command::none(),
            },
            KeyCode::Char('/') => {
                self.route = Route::Search;
                Command::none()
            }
            KeyCode::Char('u') => {
                self.route = Route::User;
                Command::none()
            }
            KeyCode::Char('r') => self
                .roster
                .start(self.api.characters())
                .map(Message::RosterFetched),
            _ => Command::none(),
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Command<Message> {
        match key.code {
            KeyCode::Char('q') => Command::message(Message::Quit),
            KeyCode::Esc | KeyCode::Backspace => {
                // Leaving the screen invalidates any in-flight attempt.
                self.detail.reset();
                self.route = Route::Roster;
                Command::none()
            }
            _ => Command::none(),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Command<Message> {
        match key.code {
            KeyCode::Esc => {
                self.search.reset();
                self.search_input.clear();
                self.route = Route::Roster;
                Command::none()
            }
            KeyCode::Enter => {
                if self.search_input.is_empty() {
                    Command::none()
                } else {
                    // Lazy query: runs only on explicit trigger.
                    self.search
                        .start(self.api.search(&self.search_input))
                        .map(Message::SearchFetched)
                }
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                Command::none()
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                Command::none()
            }
            _ => Command::none(),
        }
    }

    fn handle_user_key(&mut self, key: KeyEvent) -> Command<Message> {
        match key.code {
            KeyCode::Esc => {
                self.user.reset();
                self.user_input.clear();
                self.route = Route::Roster;
                Command::none()
            }
            KeyCode::Enter => match self.user_input.parse::<i64>() {
                Ok(id) => self.user.start(self.api.user(id)).map(Message::UserFetched),
                Err(_) => Command::none(),
            },
            KeyCode::Backspace => {
                self.user_input.pop();
                Command::none()
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.user_input.push(c);
                Command::none()
            }
            KeyCode::Char('q') => Command::message(Message::Quit),
            _ => Command::none(),
        }
    }

    fn open_detail(&mut self, id: String) -> Command<Message> {
        self.route = Route::Detail { id: id.clone() };
        // Eager query: a new id means a new attempt; any response still in
        // flight for a previous id becomes stale.
        self.detail
            .start(self.api.character(&id))
            .map(Message::DetailFetched)
    }

    fn selected_character_id(&self) -> Option<String> {
        self.roster
            .state()
            .data()
            .and_then(|data| data.characters.results.get(self.selected))
            .map(|character| character.id.clone())
    }

    fn clamp_selection(&mut self) {
        let len = self
            .roster
            .state()
            .data()
            .map_or(0, |data| data.characters.results.len());
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn view_roster(&self, frame: &mut Frame<'_>, area: Rect) {
        let title = "Characters";
        match present(
            self.roster.state(),
            |_| false,
            |data: &CharacterListData| data.characters.results.is_empty(),
        ) {
            Presentation::Idle | Presentation::Loading => {
                notice(frame, area, title, LOADING_MESSAGE);
            }
            Presentation::Failed => notice(frame, area, title, FAILED_MESSAGE),
            Presentation::NotFound => notice(frame, area, title, "Not found"),
            Presentation::NoResults => notice(frame, area, title, NO_RESULTS_MESSAGE),
            Presentation::Content(data) => {
                let items: Vec<ListItem> = data
                    .characters
                    .results
                    .iter()
                    .enumerate()
                    .map(|(i, character)| {
                        let marker = if i == self.selected { "> " } else { "  " };
                        let style = if i == self.selected {
                            Style::default().add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        };
                        ListItem::new(format!("{marker}{}", character.name)).style(style)
                    })
                    .collect();

                let count = data.characters.results.len();
                let list = List::new(items).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("{title} ({count})")),
                );
                frame.render_widget(list, area);
            }
        }
    }

    fn view_detail(&self, frame: &mut Frame<'_>, area: Rect) {
        let title = "Character";
        match present(
            self.detail.state(),
            |data: &CharacterData| data.character.is_none(),
            |_| false,
        ) {
            Presentation::Idle | Presentation::Loading => {
                notice(frame, area, title, LOADING_MESSAGE);
            }
            Presentation::Failed => notice(frame, area, title, FAILED_MESSAGE),
            Presentation::NotFound => notice(frame, area, title, "Character not found"),
            Presentation::NoResults => notice(frame, area, title, NO_RESULTS_MESSAGE),
            Presentation::Content(data) => {
                // NotFound is selected before Content, so the record exists here.
                let Some(character) = data.character.as_ref() else {
                    return;
                };

                let mut lines = vec![
                    Line::from(character.name.clone()),
                    Line::from(character.image.clone()),
                    Line::from(""),
                    Line::from("Episodes"),
                ];
                lines.extend(
                    character
                        .episode
                        .iter()
                        .map(|e| Line::from(format!("{} - {}", e.name, e.episode))),
                );

                let paragraph = Paragraph::new(lines).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("{title} {}", character.id)),
                );
                frame.render_widget(paragraph, area);
            }
        }
    }

    fn view_search(&self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let input = Paragraph::new(self.search_input.as_str())
            .block(Block::default().borders(Borders::ALL).title("Search by name"));
        frame.render_widget(input, chunks[0]);

        let title = "Results";
        match present(
            self.search.state(),
            |_| false,
            |data: &SearchData| data.characters.results.is_empty(),
        ) {
            Presentation::Idle => {
                notice(frame, chunks[1], title, "Type a name and press Enter");
            }
            Presentation::Loading => notice(frame, chunks[1], title, LOADING_MESSAGE),
            Presentation::Failed => notice(frame, chunks[1], title, FAILED_MESSAGE),
            Presentation::NotFound => notice(frame, chunks[1], title, "Not found"),
            Presentation::NoResults => notice(frame, chunks[1], title, NO_RESULTS_MESSAGE),
            Presentation::Content(data) => {
                let items: Vec<ListItem> = data
                    .characters
                    .results
                    .iter()
                    .map(|hit| ListItem::new(format!("{} · {}", hit.name, hit.location.name)))
                    .collect();

                let list = List::new(items)
                    .block(Block::default().borders(Borders::ALL).title(title));
                frame.render_widget(list, chunks[1]);
            }
        }
    }

    fn view_user(&self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let input = Paragraph::new(self.user_input.as_str())
            .block(Block::default().borders(Borders::ALL).title("User id"));
        frame.render_widget(input, chunks[0]);

        let title = "User";
        match present(
            self.user.state(),
            |data: &UserData| data.get_user.is_none(),
            |_| false,
        ) {
            Presentation::Idle => {
                notice(frame, chunks[1], title, "Enter a user id");
            }
            Presentation::Loading => notice(frame, chunks[1], title, LOADING_MESSAGE),
            Presentation::Failed => notice(frame, chunks[1], title, FAILED_MESSAGE),
            Presentation::NotFound => notice(frame, chunks[1], title, "User not found"),
            Presentation::NoResults => notice(frame, chunks[1], title, NO_RESULTS_MESSAGE),
            Presentation::Content(data) => {
                let Some(user) = data.get_user.as_ref() else {
                    return;
                };

                let mut lines = vec![
                    Line::from(format!("{} <{}>", user.username, user.email)),
                    Line::from(""),
                    Line::from("Posts"),
                ];
                lines.extend(user.posts.iter().map(|post| {
                    Line::from(format!("[{}] {}: {}", post.id, post.title, post.content))
                }));

                let paragraph = Paragraph::new(lines).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("{title} {}", user.id)),
                );
                frame.render_widget(paragraph, chunks[1]);
            }
        }
    }
}
