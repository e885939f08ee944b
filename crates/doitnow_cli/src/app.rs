//! Interactive session loop.
//!
//! # Responsibility
//! - Drive login, the per-account menus and logout over any line source.
//! - Keep the working collections and rebind them to every applied result.
//!
//! # Invariants
//! - Dirty flags start clean at every login and are set only on `Applied`.
//! - Records are written only at logout; report files only on `gr`.
//! - End of input ends the program without saving the open session.

use crate::prompt::Prompter;
use crate::views::{
    main_menu, task_card, task_cards, task_detail, user_list, CardLabel, EDIT_TASK_MENU,
    TASK_MENU, TOP_LEVEL_PROMPT, WELCOME_BANNER,
};
use chrono::NaiveDate;
use doitnow_core::model::task::ensure_due_after;
use doitnow_core::{
    add_task, authenticate, edit_owned_task, filter_incomplete_for_user, normalize_username,
    parse_date, plan_user_deletion, register_user, user_exists, write_back, AuthError,
    CommandOutcome, DirtyFlags, NewTask, RecordStore, RejectReason, RepoResult, SessionData,
    SessionService, TaskEdit, User,
};
use log::{info, warn};
use std::io::{self, BufRead, ErrorKind, Write};

/// Source of the current calendar date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

const INVALID_CHOICE: &str = "Invalid choice";

pub struct App<S: RecordStore, C: Clock, R, W> {
    session: SessionService<S>,
    clock: C,
    prompter: Prompter<R, W>,
    data: SessionData,
}

impl<S, C, R, W> App<S, C, R, W>
where
    S: RecordStore,
    C: Clock,
    R: BufRead,
    W: Write,
{
    /// Loads users and tasks from `store`.
    ///
    /// # Errors
    /// - Any load error; the caller treats it as fatal.
    pub fn new(store: S, clock: C, input: R, output: W) -> RepoResult<Self> {
        let session = SessionService::new(store);
        let data = session.load()?;
        info!(
            "event=session_load module=cli status=ok users={} tasks={}",
            data.users.len(),
            data.tasks.len()
        );
        Ok(Self {
            session,
            clock,
            prompter: Prompter::new(input, output),
            data,
        })
    }

    /// Runs until the operator exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        match self.top_level() {
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
                info!("event=input_closed module=cli status=ok");
                Ok(())
            }
            other => other,
        }
    }

    fn top_level(&mut self) -> io::Result<()> {
        self.prompter.say(WELCOME_BANNER)?;
        loop {
            let choice = self.prompter.read_trimmed(TOP_LEVEL_PROMPT)?.to_lowercase();
            match choice.as_str() {
                "l" => {
                    let user = self.login()?;
                    self.account_menu(&user)?;
                }
                "e" => {
                    self.prompter.notice("Good Bye :)")?;
                    return Ok(());
                }
                _ => self.prompter.notice(INVALID_CHOICE)?,
            }
        }
    }

    fn login(&mut self) -> io::Result<User> {
        self.prompter.say("LOGIN")?;
        loop {
            let username = self.prompter.read_trimmed("Username: ")?;
            let password = self.prompter.read_trimmed("Password: ")?;
            match authenticate(&self.data.users, &username, &password) {
                Ok(user) => {
                    let user = user.clone();
                    info!(
                        "event=login module=cli status=ok admin={}",
                        user.is_admin()
                    );
                    self.prompter.notice("Login Successful!")?;
                    return Ok(user);
                }
                Err(err) => {
                    let reason = match err {
                        AuthError::UnknownUser(_) => "unknown_user",
                        AuthError::WrongPassword(_) => "wrong_password",
                    };
                    info!("event=login module=cli status=rejected reason={reason}");
                    self.prompter.notice(&err.to_string())?;
                }
            }
        }
    }

    fn account_menu(&mut self, user: &User) -> io::Result<()> {
        let mut dirty = DirtyFlags::default();
        loop {
            let choice = self.prompter.read_trimmed(main_menu(user))?.to_lowercase();
            match (choice.as_str(), user.is_admin()) {
                ("vm", _) => self.view_mine(user, &mut dirty)?,
                ("lo", _) => return self.logout(user, dirty),
                ("r", true) => self.register(&mut dirty)?,
                ("vu", true) => self.prompter.say(&user_list(&self.data.users))?,
                ("du", true) => self.delete_user(&mut dirty)?,
                ("a", true) => self.add_task(&mut dirty)?,
                ("va", true) => self.view_all()?,
                ("gr", true) => self.generate_reports()?,
                ("ds", true) => self.display_statistics()?,
                _ => self.prompter.notice(INVALID_CHOICE)?,
            }
        }
    }

    fn register(&mut self, dirty: &mut DirtyFlags) -> io::Result<()> {
        let username = prompt_username(
            &mut self.prompter,
            &self.data.users,
            "New Username: ",
            false,
        )?;
        let password = loop {
            let password = self.prompter.prompt_until(
                "New Password: ",
                record_text,
                |_: &String| Ok(()),
            )?;
            let confirm = self.prompter.read_trimmed("Confirm Password: ")?;
            if password == confirm {
                break password;
            }
            self.prompter.notice("Passwords do not match")?;
        };

        match register_user(&self.data.users, &username, &password) {
            CommandOutcome::Applied(users) => {
                self.data.users = users;
                dirty.users = true;
                self.prompter
                    .notice(&format!("You have successfully registered {username}"))
            }
            CommandOutcome::Rejected(reason) => self.prompter.notice(&reason.to_string()),
            CommandOutcome::Aborted => Ok(()),
        }
    }

    fn delete_user(&mut self, dirty: &mut DirtyFlags) -> io::Result<()> {
        let username = prompt_username(
            &mut self.prompter,
            &self.data.users,
            "Name of user to delete :",
            true,
        )?;
        let pending = match plan_user_deletion(&self.data.users, &self.data.tasks, &username) {
            CommandOutcome::Applied(pending) => pending,
            CommandOutcome::Rejected(reason) => return self.prompter.notice(&reason.to_string()),
            CommandOutcome::Aborted => return Ok(()),
        };

        self.prompter
            .notice(&format!("Are you sure you want to delete {} ? ", pending.username()))?;
        let answer = self.prompter.read_line("Type 'yes' to confirm :")?;
        match pending.confirm(&answer) {
            CommandOutcome::Applied(users) => {
                self.data.users = users;
                dirty.users = true;
                self.prompter
                    .notice(&format!("You have deleted {username}"))
            }
            CommandOutcome::Rejected(reason) => self.prompter.notice(&reason.to_string()),
            CommandOutcome::Aborted => Ok(()),
        }
    }

    fn add_task(&mut self, dirty: &mut DirtyFlags) -> io::Result<()> {
        let today = self.clock.today();
        let username = prompt_username(
            &mut self.prompter,
            &self.data.users,
            "Name of person assigned to task :",
            true,
        )?;
        let title = self
            .prompter
            .prompt_until("Title of task: ", record_text, |_: &String| Ok(()))?;
        let description = self.prompter.prompt_until(
            "Description of task: ",
            record_text,
            |_: &String| Ok(()),
        )?;
        let due_date = prompt_due_date(&mut self.prompter, today)?;

        let request = NewTask {
            username,
            title,
            description,
            due_date,
        };
        match add_task(&self.data.tasks, &self.data.users, &request, today) {
            CommandOutcome::Applied(tasks) => {
                self.data.tasks = tasks;
                dirty.tasks = true;
                self.prompter
                    .notice(&format!("New task assigned to {}", request.username))
            }
            CommandOutcome::Rejected(reason) => self.prompter.notice(&reason.to_string()),
            CommandOutcome::Aborted => Ok(()),
        }
    }

    fn view_all(&mut self) -> io::Result<()> {
        if self.data.tasks.is_empty() {
            return self.prompter.notice("No tasks available");
        }
        let cards: String = self
            .data
            .tasks
            .iter()
            .map(|task| task_card(CardLabel::Completion, task))
            .collect();
        self.prompter.say(&cards)
    }

    fn view_mine(&mut self, user: &User, dirty: &mut DirtyFlags) -> io::Result<()> {
        let today = self.clock.today();
        let view = filter_incomplete_for_user(&self.data.tasks, &user.username);
        if view.is_empty() {
            return self.prompter.notice("You don't have any tasks");
        }
        self.prompter.say(&task_cards(&view))?;

        let number = self
            .prompter
            .prompt_int("Enter number of task to select or -1 for main menu: ")?;
        if number == -1 {
            return Ok(());
        }
        let Some(entry) = usize::try_from(number)
            .ok()
            .and_then(|num| num.checked_sub(1))
            .and_then(|index| view.get(index))
        else {
            return self.prompter.notice("Not a valid task number");
        };
        self.prompter.say(&task_detail(entry))?;

        let edit = self.choose_edit(today)?;
        let done_message = match edit {
            TaskEdit::MarkComplete => {
                format!("Task - {} - has been marked as complete", entry.task.title)
            }
            _ => format!("Task - {} - has been edited", entry.task.title),
        };

        let outcome = edit_owned_task(entry, &self.data.users, edit, today)
            .and_then(|edited| write_back(&self.data.tasks, edited));
        match outcome {
            CommandOutcome::Applied(tasks) => {
                self.data.tasks = tasks;
                dirty.tasks = true;
                self.prompter.notice(&done_message)
            }
            CommandOutcome::Rejected(reason) => {
                warn!("event=task_edit module=cli status=rejected reason={reason}");
                self.prompter.notice(&reason.to_string())
            }
            CommandOutcome::Aborted => Ok(()),
        }
    }

    fn choose_edit(&mut self, today: NaiveDate) -> io::Result<TaskEdit> {
        loop {
            let choice = self.prompter.read_trimmed(TASK_MENU)?.to_lowercase();
            match choice.as_str() {
                "mc" => return Ok(TaskEdit::MarkComplete),
                "et" => return self.choose_field_edit(today),
                "e" => return Ok(TaskEdit::Abort),
                _ => self.prompter.notice(INVALID_CHOICE)?,
            }
        }
    }

    fn choose_field_edit(&mut self, today: NaiveDate) -> io::Result<TaskEdit> {
        loop {
            let choice = self.prompter.read_trimmed(EDIT_TASK_MENU)?.to_lowercase();
            match choice.as_str() {
                "cu" => {
                    let username = prompt_username(
                        &mut self.prompter,
                        &self.data.users,
                        "New user for this task :",
                        true,
                    )?;
                    return Ok(TaskEdit::Reassign(username));
                }
                "cd" => {
                    let due_date = prompt_due_date(&mut self.prompter, today)?;
                    return Ok(TaskEdit::ChangeDueDate(due_date));
                }
                "e" => return Ok(TaskEdit::Abort),
                _ => self.prompter.notice(INVALID_CHOICE)?,
            }
        }
    }

    fn generate_reports(&mut self) -> io::Result<()> {
        let today = self.clock.today();
        match self.session.publish_reports(&self.data, today) {
            Ok(published) => {
                for failure in &published.failures {
                    self.prompter.notice(&failure.to_string())?;
                }
                if published.failures.is_empty() {
                    self.prompter.notice("Reports generated")?;
                }
                Ok(())
            }
            Err(err) => self.prompter.notice(&err.to_string()),
        }
    }

    fn display_statistics(&mut self) -> io::Result<()> {
        match self.session.load_statistics() {
            Ok(Some(stats)) => {
                self.prompter.say(&stats.task_report)?;
                self.prompter.say(&stats.user_report)
            }
            Ok(None) => self
                .prompter
                .notice("No statistics to display. Type gr to generate reports"),
            Err(err) => {
                warn!("event=stats_load module=cli status=error");
                self.prompter.notice(&err.to_string())
            }
        }
    }

    fn logout(&mut self, user: &User, dirty: DirtyFlags) -> io::Result<()> {
        let report = self.session.logout_save(&user.username, &self.data, dirty);
        for message in &report.messages {
            self.prompter.notice(message)?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        self.prompter.output()
    }
}

/// Free text stored inside one record field.
fn record_text(answer: &str) -> Result<String, String> {
    if answer.contains(doitnow_core::repo::record_codec::FIELD_DELIMITER) {
        return Err("Text cannot contain ';'".to_string());
    }
    Ok(answer.to_string())
}

/// Asks for a username that must (or must not) already be registered.
fn prompt_username<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    users: &[User],
    message: &str,
    should_exist: bool,
) -> io::Result<String> {
    prompter.prompt_until(
        message,
        |answer| {
            let username = record_text(&normalize_username(answer))?;
            if username.is_empty() {
                return Err("Username cannot be empty".to_string());
            }
            Ok(username)
        },
        |username| match (user_exists(users, username), should_exist) {
            (true, true) | (false, false) => Ok(()),
            (false, true) => Err(RejectReason::UnknownUser(username.clone()).to_string()),
            (true, false) => Err(RejectReason::UsernameTaken(username.clone()).to_string()),
        },
    )
}

/// Asks for a `YYYY-MM-DD` date strictly after `today`.
fn prompt_due_date<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    today: NaiveDate,
) -> io::Result<NaiveDate> {
    prompter.prompt_until(
        "Due date of task (YYYY-MM-DD): ",
        |answer| {
            parse_date(answer).ok_or_else(|| {
                "Invalid datetime format. Please use the format specified".to_string()
            })
        },
        |due_date| {
            ensure_due_after(*due_date, today)
                .map_err(|err| RejectReason::from(err).to_string())
        },
    )
}
