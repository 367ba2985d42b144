//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, Utc};
use questlog_core::{
  Error as CoreError,
  store::GameStore,
  task::{NewTask, Repeat, TaskScope},
  user::{NewUser, User},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn register(s: &SqliteStore, handle: &str) -> User {
  s.create_user(NewUser {
    handle:   handle.into(),
    nickname: handle.to_uppercase(),
  })
  .await
  .unwrap()
}

fn reward_task(scope: TaskScope, repeat: Repeat) -> NewTask {
  NewTask {
    text: "Practice guitar".into(),
    scope,
    repeat,
    reward_exp: 15,
    reward_coins: 8,
    penalty: 5,
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_sets_starting_stats() {
  let s = store().await;
  let user = register(&s, "alice").await;

  assert_eq!(user.level, 1);
  assert_eq!(user.exp, 0);
  assert_eq!(user.coins, 0);
  assert_eq!(user.hp, 100);
  assert_eq!(user.max_hp, 100);

  let fetched = s.get_user(user.user_id).await.unwrap().unwrap();
  assert_eq!(fetched.user_id, user.user_id);
  assert_eq!(fetched.handle, "alice");
}

#[tokio::test]
async fn register_seeds_five_starter_tasks() {
  let s = store().await;
  let user = register(&s, "alice").await;

  let tasks = s.list_tasks_for(user.user_id).await.unwrap();
  assert_eq!(tasks.len(), 5);
  assert!(tasks.iter().all(|t| matches!(
    t.scope,
    TaskScope::Personal { owner } if owner == user.user_id
  )));
  assert!(tasks.iter().all(|t| matches!(t.repeat, Repeat::Every { .. })));
}

#[tokio::test]
async fn duplicate_handle_is_rejected() {
  let s = store().await;
  register(&s, "alice").await;

  let err = s
    .create_user(NewUser {
      handle:   "alice".into(),
      nickname: "Impostor".into(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::HandleTaken(h) if h == "alice"));
}

#[tokio::test]
async fn duplicate_handle_seeds_no_tasks() {
  // The rejected registration must roll back entirely, starter tasks
  // included.
  let s = store().await;
  let user = register(&s, "alice").await;
  let _ = s
    .create_user(NewUser {
      handle:   "alice".into(),
      nickname: "Impostor".into(),
    })
    .await;

  assert_eq!(s.list_tasks_for(user.user_id).await.unwrap().len(), 5);
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_task() {
  let s = store().await;
  let user = register(&s, "alice").await;

  let task = s
    .create_task(reward_task(
      TaskScope::Personal { owner: user.user_id },
      Repeat::Every { cooldown: Duration::hours(2) },
    ))
    .await
    .unwrap();

  let fetched = s.get_task(task.task_id).await.unwrap().unwrap();
  assert_eq!(fetched.text, "Practice guitar");
  assert_eq!(fetched.scope, TaskScope::Personal { owner: user.user_id });
  assert_eq!(fetched.repeat, Repeat::Every { cooldown: Duration::hours(2) });
  assert_eq!(fetched.reward_exp, 15);
  assert_eq!(fetched.reward_coins, 8);
  assert_eq!(fetched.penalty, 5);
}

#[tokio::test]
async fn get_task_missing_returns_none() {
  let s = store().await;
  assert!(s.get_task(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn listing_excludes_other_users_personal_tasks() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let bob = register(&s, "bob").await;

  s.create_task(reward_task(
    TaskScope::Personal { owner: bob.user_id },
    Repeat::Unlimited,
  ))
  .await
  .unwrap();
  let system = s
    .create_task(reward_task(TaskScope::System, Repeat::Unlimited))
    .await
    .unwrap();

  let visible = s.list_tasks_for(alice.user_id).await.unwrap();
  // 5 starters + the system task; bob's personal task is not included.
  assert_eq!(visible.len(), 6);
  assert!(visible.iter().any(|t| t.task_id == system.task_id));
}

#[tokio::test]
async fn clan_tasks_are_visible_to_members_only() {
  let s = store().await;
  let member = register(&s, "member").await;
  let outsider = register(&s, "outsider").await;

  let clan = s.create_clan("Night Watch".into()).await.unwrap();
  s.add_clan_member(clan.clan_id, member.user_id).await.unwrap();

  let task = s
    .create_task(reward_task(
      TaskScope::Clan { clan_id: clan.clan_id },
      Repeat::Unlimited,
    ))
    .await
    .unwrap();

  let member_view = s.list_tasks_for(member.user_id).await.unwrap();
  assert!(member_view.iter().any(|t| t.task_id == task.task_id));

  let outsider_view = s.list_tasks_for(outsider.user_id).await.unwrap();
  assert!(!outsider_view.iter().any(|t| t.task_id == task.task_id));
}

// ─── Completion ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn complete_grants_reward_and_appends_history() {
  let s = store().await;
  let user = register(&s, "alice").await;
  let task = s
    .create_task(reward_task(
      TaskScope::Personal { owner: user.user_id },
      Repeat::Unlimited,
    ))
    .await
    .unwrap();

  let out = s.complete_task(user.user_id, task.task_id).await.unwrap();
  assert_eq!(out.reward.exp_gained, 15);
  assert_eq!(out.reward.coins_gained, 8);
  assert_eq!(out.reward.new_balance, 8);

  let stored = s.get_user(user.user_id).await.unwrap().unwrap();
  assert_eq!(stored.exp, 15);
  assert_eq!(stored.coins, 8);

  let history = s.completions_for(user.user_id).await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].task_id, task.task_id);
  assert_eq!(history[0].exp_granted, 15);
  assert_eq!(history[0].coins_granted, 8);
}

#[tokio::test]
async fn completing_unknown_task_is_not_found() {
  let s = store().await;
  let user = register(&s, "alice").await;

  let missing = Uuid::new_v4();
  let err = s.complete_task(user.user_id, missing).await.unwrap_err();
  assert!(matches!(err, CoreError::TaskNotFound(id) if id == missing));
}

#[tokio::test]
async fn completing_as_unknown_user_is_not_found() {
  let s = store().await;
  let task = s
    .create_task(reward_task(TaskScope::System, Repeat::Unlimited))
    .await
    .unwrap();

  let missing = Uuid::new_v4();
  let err = s.complete_task(missing, task.task_id).await.unwrap_err();
  assert!(matches!(err, CoreError::UserNotFound(id) if id == missing));
}

#[tokio::test]
async fn one_shot_task_completes_exactly_once() {
  let s = store().await;
  let user = register(&s, "alice").await;
  let task = s
    .create_task(reward_task(
      TaskScope::Personal { owner: user.user_id },
      Repeat::OneShot,
    ))
    .await
    .unwrap();

  s.complete_task(user.user_id, task.task_id).await.unwrap();

  let err = s
    .complete_task(user.user_id, task.task_id)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::AlreadyCompleted(id) if id == task.task_id));
}

#[tokio::test]
async fn denied_attempt_mutates_nothing() {
  let s = store().await;
  let user = register(&s, "alice").await;
  let task = s
    .create_task(reward_task(
      TaskScope::Personal { owner: user.user_id },
      Repeat::OneShot,
    ))
    .await
    .unwrap();

  s.complete_task(user.user_id, task.task_id).await.unwrap();
  let before = s.get_user(user.user_id).await.unwrap().unwrap();

  let _ = s.complete_task(user.user_id, task.task_id).await;

  let after = s.get_user(user.user_id).await.unwrap().unwrap();
  assert_eq!(after.exp, before.exp);
  assert_eq!(after.coins, before.coins);
  assert_eq!(after.updated_at, before.updated_at);
  assert_eq!(s.completions_for(user.user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn cooldown_gates_and_then_reopens() {
  let s = store().await;
  let user = register(&s, "alice").await;
  let task = s
    .create_task(reward_task(
      TaskScope::Personal { owner: user.user_id },
      Repeat::Every { cooldown: Duration::hours(1) },
    ))
    .await
    .unwrap();

  let t0 = Utc::now();
  let first = s
    .complete_task_at(user.user_id, task.task_id, t0)
    .await
    .unwrap();
  assert_eq!(first.record.completed_at, t0);
  assert_eq!(first.record.next_available, Some(t0 + Duration::hours(1)));

  // 30 minutes in: still on cooldown, retry-after is exact.
  let err = s
    .complete_task_at(user.user_id, task.task_id, t0 + Duration::minutes(30))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(CoreError::OnCooldown { available_at })
      if available_at == t0 + Duration::hours(1)
  ));

  // 61 minutes in: the gate reopens.
  let second = s
    .complete_task_at(user.user_id, task.task_id, t0 + Duration::minutes(61))
    .await
    .unwrap();
  assert_eq!(second.user.exp, 30);
  assert_eq!(second.user.coins, 16);

  assert_eq!(s.completions_for(user.user_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn stranger_is_forbidden_on_personal_task() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let bob = register(&s, "bob").await;

  let task = s
    .create_task(reward_task(
      TaskScope::Personal { owner: alice.user_id },
      Repeat::Unlimited,
    ))
    .await
    .unwrap();

  let err = s.complete_task(bob.user_id, task.task_id).await.unwrap_err();
  assert!(matches!(err, CoreError::Forbidden { .. }));

  assert!(s.completions_for(bob.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn clan_task_requires_membership() {
  let s = store().await;
  let member = register(&s, "member").await;
  let outsider = register(&s, "outsider").await;

  let clan = s.create_clan("Night Watch".into()).await.unwrap();
  s.add_clan_member(clan.clan_id, member.user_id).await.unwrap();

  let task = s
    .create_task(reward_task(
      TaskScope::Clan { clan_id: clan.clan_id },
      Repeat::Unlimited,
    ))
    .await
    .unwrap();

  let err = s
    .complete_task(outsider.user_id, task.task_id)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Forbidden { .. }));

  let out = s.complete_task(member.user_id, task.task_id).await.unwrap();
  assert_eq!(out.reward.coins_gained, 8);
}

#[tokio::test]
async fn system_task_is_open_to_everyone() {
  let s = store().await;
  let alice = register(&s, "alice").await;
  let bob = register(&s, "bob").await;

  let task = s
    .create_task(reward_task(TaskScope::System, Repeat::Unlimited))
    .await
    .unwrap();

  s.complete_task(alice.user_id, task.task_id).await.unwrap();
  s.complete_task(bob.user_id, task.task_id).await.unwrap();

  assert_eq!(s.completions_for(alice.user_id).await.unwrap().len(), 1);
  assert_eq!(s.completions_for(bob.user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn large_reward_cascades_level_ups() {
  let s = store().await;
  let user = register(&s, "alice").await;

  let mut input = reward_task(
    TaskScope::Personal { owner: user.user_id },
    Repeat::Unlimited,
  );
  input.reward_exp = 650;
  let task = s.create_task(input).await.unwrap();

  let out = s.complete_task(user.user_id, task.task_id).await.unwrap();
  assert_eq!(out.reward.new_level, 7);
  assert!(out.reward.leveled_up);

  let stored = s.get_user(user.user_id).await.unwrap().unwrap();
  assert_eq!(stored.level, 7);
  assert_eq!(stored.max_hp, 160);
}

#[tokio::test]
async fn custom_curve_changes_the_threshold() {
  let s = store().await.with_curve(questlog_core::leveling::LevelCurve {
    exp_per_level:    50,
    max_hp_per_level: 20,
  });
  let user = register(&s, "alice").await;

  let mut input = reward_task(
    TaskScope::Personal { owner: user.user_id },
    Repeat::Unlimited,
  );
  input.reward_exp = 60;
  let task = s.create_task(input).await.unwrap();

  let out = s.complete_task(user.user_id, task.task_id).await.unwrap();
  assert_eq!(out.reward.new_level, 2);

  let stored = s.get_user(user.user_id).await.unwrap().unwrap();
  assert_eq!(stored.max_hp, 120);
}

#[tokio::test]
async fn completions_are_listed_most_recent_first() {
  let s = store().await;
  let user = register(&s, "alice").await;
  let task = s
    .create_task(reward_task(
      TaskScope::Personal { owner: user.user_id },
      Repeat::Unlimited,
    ))
    .await
    .unwrap();

  let t0 = Utc::now();
  for minutes in [0, 10, 20] {
    s.complete_task_at(user.user_id, task.task_id, t0 + Duration::minutes(minutes))
      .await
      .unwrap();
  }

  let history = s.completions_for(user.user_id).await.unwrap();
  assert_eq!(history.len(), 3);
  assert_eq!(history[0].completed_at, t0 + Duration::minutes(20));
  assert_eq!(history[2].completed_at, t0);
}

// ─── Clans ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_member_to_unknown_clan_errors() {
  let s = store().await;
  let user = register(&s, "alice").await;

  let missing = Uuid::new_v4();
  let err = s.add_clan_member(missing, user.user_id).await.unwrap_err();
  assert!(matches!(err, CoreError::ClanNotFound(id) if id == missing));
}

#[tokio::test]
async fn add_unknown_user_to_clan_errors() {
  let s = store().await;
  let clan = s.create_clan("Night Watch".into()).await.unwrap();

  let missing = Uuid::new_v4();
  let err = s.add_clan_member(clan.clan_id, missing).await.unwrap_err();
  assert!(matches!(err, CoreError::UserNotFound(id) if id == missing));
}
