//! [`SqliteStore`] — the SQLite implementation of [`GameStore`].

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use questlog_core::{
  Error as CoreError,
  clan::Clan,
  completion::CompletionRecord,
  leveling::LevelCurve,
  store::GameStore,
  task::{NewTask, Repeat, Task, TaskScope},
  user::{NewUser, User},
  workflow::{self, CompletionResult},
};

use crate::{
  Result,
  encode::{
    RawCompletion, RawTask, RawUser, encode_dt, encode_repeat, encode_scope,
    encode_uuid,
  },
  schema::SCHEMA,
};

/// Tasks seeded for every new user at registration:
/// (text, cooldown seconds, reward exp, reward coins, penalty).
const STARTER_TASKS: [(&str, i64, i64, i64, i64); 5] = [
  ("Drink a glass of water", 3_600, 10, 5, 3),
  ("Stretch for five minutes", 7_200, 15, 8, 5),
  ("Take a ten-minute walk", 14_400, 20, 10, 5),
  ("Read ten pages", 86_400, 30, 15, 8),
  ("Tidy your workspace", 86_400, 25, 12, 5),
];

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Questlog game store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All
/// operations run serialized on the connection's dedicated thread, and
/// `complete_task` additionally wraps its read–decide–write sequence in
/// an immediate transaction.
#[derive(Clone)]
pub struct SqliteStore {
  conn:  tokio_rusqlite::Connection,
  curve: LevelCurve,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, curve: LevelCurve::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, curve: LevelCurve::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Replace the leveling curve (the default is `level * 100` exp with
  /// +10 max HP per level).
  pub fn with_curve(mut self, curve: LevelCurve) -> Self {
    self.curve = curve;
    self
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `op` on the connection thread, flattening both error layers.
  async fn with_conn<T, F>(&self, op: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut rusqlite::Connection) -> Result<T> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(op(conn))).await?
  }

  /// [`GameStore::complete_task`] with a caller-supplied clock, for tests
  /// and backfills.
  pub async fn complete_task_at(
    &self,
    user_id: Uuid,
    task_id: Uuid,
    now:     DateTime<Utc>,
  ) -> Result<CompletionResult> {
    let curve = self.curve;
    self
      .with_conn(move |conn| complete_in_tx(conn, user_id, task_id, &curve, now))
      .await
  }
}

// ─── Completion transaction ──────────────────────────────────────────────────

/// The whole completion workflow as one immediate transaction: the write
/// lock is taken before the history read, so two concurrent attempts for
/// the same (user, task) pair serialize and the loser re-reads committed
/// history. The user update and the completion insert commit together;
/// any early return unwinds the transaction on drop.
fn complete_in_tx(
  conn:    &mut rusqlite::Connection,
  user_id: Uuid,
  task_id: Uuid,
  curve:   &LevelCurve,
  now:     DateTime<Utc>,
) -> Result<CompletionResult> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let user = read_user(&tx, user_id)?.ok_or(CoreError::UserNotFound(user_id))?;
  let task = read_task(&tx, task_id)?.ok_or(CoreError::TaskNotFound(task_id))?;
  let last = latest_completion(&tx, user_id, task_id)?;

  // Membership is only consulted for clan-scoped tasks.
  let in_scope = match task.scope {
    TaskScope::Clan { clan_id } => is_member(&tx, clan_id, user_id)?,
    TaskScope::Personal { .. } | TaskScope::System => false,
  };

  let outcome = workflow::evaluate(&user, &task, last.as_ref(), in_scope, curve, now)?;

  update_user(&tx, &outcome.user)?;
  insert_completion(&tx, &outcome.record)?;
  tx.commit()?;

  Ok(outcome)
}

// ─── Row access ──────────────────────────────────────────────────────────────

fn read_user(conn: &rusqlite::Connection, id: Uuid) -> Result<Option<User>> {
  let raw: Option<RawUser> = conn
    .query_row(
      "SELECT user_id, handle, nickname, level, exp, coins, hp, max_hp,
              created_at, updated_at
       FROM users WHERE user_id = ?1",
      rusqlite::params![encode_uuid(id)],
      |row| {
        Ok(RawUser {
          user_id:    row.get(0)?,
          handle:     row.get(1)?,
          nickname:   row.get(2)?,
          level:      row.get(3)?,
          exp:        row.get(4)?,
          coins:      row.get(5)?,
          hp:         row.get(6)?,
          max_hp:     row.get(7)?,
          created_at: row.get(8)?,
          updated_at: row.get(9)?,
        })
      },
    )
    .optional()?;

  raw.map(RawUser::into_user).transpose()
}

fn handle_exists(conn: &rusqlite::Connection, handle: &str) -> Result<bool> {
  let exists: bool = conn
    .query_row(
      "SELECT 1 FROM users WHERE handle = ?1",
      rusqlite::params![handle],
      |_| Ok(true),
    )
    .optional()?
    .unwrap_or(false);
  Ok(exists)
}

fn insert_user(conn: &rusqlite::Connection, user: &User) -> Result<()> {
  conn.execute(
    "INSERT INTO users (user_id, handle, nickname, level, exp, coins, hp,
                        max_hp, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    rusqlite::params![
      encode_uuid(user.user_id),
      user.handle,
      user.nickname,
      user.level,
      user.exp,
      user.coins,
      user.hp,
      user.max_hp,
      encode_dt(user.created_at),
      encode_dt(user.updated_at),
    ],
  )?;
  Ok(())
}

fn update_user(conn: &rusqlite::Connection, user: &User) -> Result<()> {
  conn.execute(
    "UPDATE users
     SET level = ?2, exp = ?3, coins = ?4, hp = ?5, max_hp = ?6,
         updated_at = ?7
     WHERE user_id = ?1",
    rusqlite::params![
      encode_uuid(user.user_id),
      user.level,
      user.exp,
      user.coins,
      user.hp,
      user.max_hp,
      encode_dt(user.updated_at),
    ],
  )?;
  Ok(())
}

fn map_task_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTask> {
  Ok(RawTask {
    task_id:       row.get(0)?,
    text:          row.get(1)?,
    scope:         row.get(2)?,
    owner_id:      row.get(3)?,
    clan_id:       row.get(4)?,
    repeat:        row.get(5)?,
    cooldown_secs: row.get(6)?,
    reward_exp:    row.get(7)?,
    reward_coins:  row.get(8)?,
    penalty:       row.get(9)?,
    created_at:    row.get(10)?,
  })
}

const TASK_COLUMNS: &str = "task_id, text, scope, owner_id, clan_id, repeat,
                            cooldown_secs, reward_exp, reward_coins, penalty,
                            created_at";

fn read_task(conn: &rusqlite::Connection, id: Uuid) -> Result<Option<Task>> {
  let raw: Option<RawTask> = conn
    .query_row(
      &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE task_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      map_task_row,
    )
    .optional()?;

  raw.map(RawTask::into_task).transpose()
}

fn insert_task(conn: &rusqlite::Connection, task: &Task) -> Result<()> {
  let (scope, owner_id, clan_id) = encode_scope(task.scope);
  let (repeat, cooldown_secs) = encode_repeat(task.repeat);

  conn.execute(
    "INSERT INTO tasks (task_id, text, scope, owner_id, clan_id, repeat,
                        cooldown_secs, reward_exp, reward_coins, penalty,
                        created_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    rusqlite::params![
      encode_uuid(task.task_id),
      task.text,
      scope,
      owner_id,
      clan_id,
      repeat,
      cooldown_secs,
      task.reward_exp,
      task.reward_coins,
      task.penalty,
      encode_dt(task.created_at),
    ],
  )?;
  Ok(())
}

fn list_tasks(conn: &rusqlite::Connection, user_id: Uuid) -> Result<Vec<Task>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {TASK_COLUMNS} FROM tasks
     WHERE (scope = 'personal' AND owner_id = ?1)
        OR scope = 'system'
        OR (scope = 'clan' AND clan_id IN
              (SELECT clan_id FROM clan_members WHERE user_id = ?1))
     ORDER BY created_at"
  ))?;

  let raws = stmt
    .query_map(rusqlite::params![encode_uuid(user_id)], map_task_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws.into_iter().map(RawTask::into_task).collect()
}

fn map_completion_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawCompletion> {
  Ok(RawCompletion {
    completion_id:  row.get(0)?,
    user_id:        row.get(1)?,
    task_id:        row.get(2)?,
    completed_at:   row.get(3)?,
    next_available: row.get(4)?,
    exp_granted:    row.get(5)?,
    coins_granted:  row.get(6)?,
  })
}

const COMPLETION_COLUMNS: &str = "completion_id, user_id, task_id, completed_at,
                                  next_available, exp_granted, coins_granted";

/// The most recent completion for one (user, task) pair — the row the
/// cooldown gate is derived from.
fn latest_completion(
  conn:    &rusqlite::Connection,
  user_id: Uuid,
  task_id: Uuid,
) -> Result<Option<CompletionRecord>> {
  let raw: Option<RawCompletion> = conn
    .query_row(
      &format!(
        "SELECT {COMPLETION_COLUMNS} FROM completions
         WHERE user_id = ?1 AND task_id = ?2
         ORDER BY completed_at DESC, rowid DESC
         LIMIT 1"
      ),
      rusqlite::params![encode_uuid(user_id), encode_uuid(task_id)],
      map_completion_row,
    )
    .optional()?;

  raw.map(RawCompletion::into_completion).transpose()
}

fn insert_completion(
  conn:   &rusqlite::Connection,
  record: &CompletionRecord,
) -> Result<()> {
  conn.execute(
    "INSERT INTO completions (completion_id, user_id, task_id, completed_at,
                              next_available, exp_granted, coins_granted)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    rusqlite::params![
      encode_uuid(record.completion_id),
      encode_uuid(record.user_id),
      encode_uuid(record.task_id),
      encode_dt(record.completed_at),
      record.next_available.map(encode_dt),
      record.exp_granted,
      record.coins_granted,
    ],
  )?;
  Ok(())
}

fn list_completions(
  conn:    &rusqlite::Connection,
  user_id: Uuid,
) -> Result<Vec<CompletionRecord>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {COMPLETION_COLUMNS} FROM completions
     WHERE user_id = ?1
     ORDER BY completed_at DESC, rowid DESC"
  ))?;

  let raws = stmt
    .query_map(rusqlite::params![encode_uuid(user_id)], map_completion_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws.into_iter().map(RawCompletion::into_completion).collect()
}

fn clan_exists(conn: &rusqlite::Connection, clan_id: Uuid) -> Result<bool> {
  let exists: bool = conn
    .query_row(
      "SELECT 1 FROM clans WHERE clan_id = ?1",
      rusqlite::params![encode_uuid(clan_id)],
      |_| Ok(true),
    )
    .optional()?
    .unwrap_or(false);
  Ok(exists)
}

fn is_member(
  conn:    &rusqlite::Connection,
  clan_id: Uuid,
  user_id: Uuid,
) -> Result<bool> {
  let member: bool = conn
    .query_row(
      "SELECT 1 FROM clan_members WHERE clan_id = ?1 AND user_id = ?2",
      rusqlite::params![encode_uuid(clan_id), encode_uuid(user_id)],
      |_| Ok(true),
    )
    .optional()?
    .unwrap_or(false);
  Ok(member)
}

// ─── GameStore impl ──────────────────────────────────────────────────────────

impl GameStore for SqliteStore {
  async fn create_user(&self, input: NewUser) -> questlog_core::Result<User> {
    let now = Utc::now();
    let user = User {
      user_id:    Uuid::new_v4(),
      handle:     input.handle,
      nickname:   input.nickname,
      level:      1,
      exp:        0,
      coins:      0,
      hp:         100,
      max_hp:     100,
      created_at: now,
      updated_at: now,
    };

    let starters: Vec<Task> = STARTER_TASKS
      .iter()
      .map(|&(text, secs, exp, coins, penalty)| Task {
        task_id:      Uuid::new_v4(),
        text:         text.to_owned(),
        scope:        TaskScope::Personal { owner: user.user_id },
        repeat:       Repeat::Every { cooldown: Duration::seconds(secs) },
        reward_exp:   exp,
        reward_coins: coins,
        penalty,
        created_at:   now,
      })
      .collect();

    let persisted = user.clone();
    self
      .with_conn(move |conn| {
        let tx = conn.transaction()?;
        if handle_exists(&tx, &persisted.handle)? {
          return Err(CoreError::HandleTaken(persisted.handle.clone()).into());
        }
        insert_user(&tx, &persisted)?;
        for task in &starters {
          insert_task(&tx, task)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> questlog_core::Result<Option<User>> {
    Ok(self.with_conn(move |conn| read_user(conn, id)).await?)
  }

  async fn create_task(&self, input: NewTask) -> questlog_core::Result<Task> {
    let task = Task {
      task_id:      Uuid::new_v4(),
      text:         input.text,
      scope:        input.scope,
      repeat:       input.repeat,
      reward_exp:   input.reward_exp,
      reward_coins: input.reward_coins,
      penalty:      input.penalty,
      created_at:   Utc::now(),
    };

    let persisted = task.clone();
    self
      .with_conn(move |conn| insert_task(conn, &persisted))
      .await?;

    Ok(task)
  }

  async fn get_task(&self, id: Uuid) -> questlog_core::Result<Option<Task>> {
    Ok(self.with_conn(move |conn| read_task(conn, id)).await?)
  }

  async fn list_tasks_for(&self, user_id: Uuid) -> questlog_core::Result<Vec<Task>> {
    Ok(self.with_conn(move |conn| list_tasks(conn, user_id)).await?)
  }

  async fn complete_task(
    &self,
    user_id: Uuid,
    task_id: Uuid,
  ) -> questlog_core::Result<CompletionResult> {
    Ok(self.complete_task_at(user_id, task_id, Utc::now()).await?)
  }

  async fn completions_for(
    &self,
    user_id: Uuid,
  ) -> questlog_core::Result<Vec<CompletionRecord>> {
    Ok(self.with_conn(move |conn| list_completions(conn, user_id)).await?)
  }

  async fn create_clan(&self, name: String) -> questlog_core::Result<Clan> {
    let clan = Clan {
      clan_id:    Uuid::new_v4(),
      name,
      created_at: Utc::now(),
    };

    let persisted = clan.clone();
    self
      .with_conn(move |conn| {
        conn.execute(
          "INSERT INTO clans (clan_id, name, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![
            encode_uuid(persisted.clan_id),
            persisted.name,
            encode_dt(persisted.created_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(clan)
  }

  async fn add_clan_member(
    &self,
    clan_id: Uuid,
    user_id: Uuid,
  ) -> questlog_core::Result<()> {
    let now = Utc::now();
    self
      .with_conn(move |conn| {
        if !clan_exists(conn, clan_id)? {
          return Err(CoreError::ClanNotFound(clan_id).into());
        }
        if read_user(conn, user_id)?.is_none() {
          return Err(CoreError::UserNotFound(user_id).into());
        }
        conn.execute(
          "INSERT INTO clan_members (clan_id, user_id, joined_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![
            encode_uuid(clan_id),
            encode_uuid(user_id),
            encode_dt(now),
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
