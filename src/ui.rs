use crate::analytics::{challenge_streak, display_percentage, streak_overview};
use crate::challenges::marked_today;
use crate::models::{Challenge, UserProfile};
use chrono::{DateTime, Utc};

pub fn render_landing() -> String {
    LANDING_HTML.to_string()
}

pub fn render_dashboard(uid: &str, profile: &UserProfile, now: DateTime<Utc>, first_visit: bool) -> String {
    let today = now.date_naive();
    let overview = streak_overview(&profile.challenges);
    let rows = if profile.challenges.is_empty() {
        r#"<p class="hint">No challenges yet. Create one through the API to get started.</p>"#.to_string()
    } else {
        profile
            .challenges
            .iter()
            .map(|challenge| render_challenge(challenge, now))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let welcome = if first_visit {
        r#"<p class="welcome">Welcome to your hub! Every streak starts with day one.</p>"#
    } else {
        ""
    };
    let reflection = profile
        .daily_notes
        .get(&today)
        .map(|note| escape_html(note))
        .unwrap_or_else(|| "Nothing written yet today.".to_string());

    DASHBOARD_HTML
        .replace("{{WELCOME}}", welcome)
        .replace("{{NAME}}", &escape_html(&profile.name))
        .replace("{{DATE}}", &today.to_string())
        .replace("{{CURRENT}}", &overview.current_streak.to_string())
        .replace("{{BEST}}", &overview.max_streak.to_string())
        .replace("{{COUNT}}", &profile.challenges.len().to_string())
        .replace("{{REFLECTION}}", &reflection)
        .replace("{{CHALLENGES}}", &rows)
        .replace("{{UID}}", &escape_html(uid))
}

fn render_challenge(challenge: &Challenge, now: DateTime<Utc>) -> String {
    let percentage = display_percentage(challenge.completed_days, challenge.duration);
    let finished = challenge.completed_days >= challenge.duration;
    let status = if finished {
        format!("Day {} of {} ✅", challenge.completed_days, challenge.duration)
    } else {
        format!("Day {} of {}", challenge.completed_days + 1, challenge.duration)
    };
    let disabled = if finished || marked_today(challenge, now) {
        " disabled"
    } else {
        ""
    };
    let streak = challenge_streak(challenge);

    format!(
        r#"<div class="stat challenge">
  <span class="label">{name}</span>
  <span class="value">{percentage}%</span>
  <div class="bar"><div style="width: {percentage}%"></div></div>
  <span class="hint">{status} · streak {current} (best {max})</span>
  <button class="btn-add" type="button" data-id="{id}"{disabled}>Mark today complete</button>
</div>"#,
        name = escape_html(&title_case(&challenge.name)),
        id = escape_html(&challenge.id),
        current = streak.current,
        max = streak.max,
    )
}

pub fn title_case(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
    :root {
      --bg-1: #eef6f4;
      --ink: #1f2d2b;
      --accent: #2ec4b6;
      --accent-2: #264653;
      --card: rgba(255, 255, 255, 0.9);
    }
    * { box-sizing: border-box; }
    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg-1), #fdf6ec);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px;
    }
    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 24px;
      padding: 32px;
      display: grid;
      gap: 24px;
    }
    h1 { margin: 0; font-family: Georgia, serif; }
    .panel { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 16px; }
    .stat { background: white; border-radius: 16px; padding: 16px; display: grid; gap: 8px; }
    .label { font-size: 0.85rem; text-transform: uppercase; letter-spacing: 0.1em; color: #6b7c79; }
    .value { font-size: 1.6rem; font-weight: 600; color: var(--accent-2); }
    .bar { height: 8px; background: #e3ecea; border-radius: 999px; overflow: hidden; }
    .bar div { height: 100%; background: var(--accent); }
    .hint { margin: 0; color: #6f6a65; font-size: 0.9rem; }
    .welcome { margin: 0; color: var(--accent-2); font-weight: 600; }
    button { border: none; border-radius: 999px; padding: 10px 16px; font-weight: 600; cursor: pointer; }
    button:disabled { opacity: 0.5; cursor: default; }
    .btn-add { background: var(--accent); color: white; }
"#;

const LANDING_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Resilience Hub</title>
  <link rel="stylesheet" href="/static/hub.css" />
</head>
<body>
  <main class="app">
    <h1>Resilience Hub</h1>
    <p class="hint">Build habits one day at a time. Open <code>/users/&lt;your id&gt;</code> to see your dashboard.</p>
  </main>
</body>
</html>
"#;

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Resilience Hub · {{NAME}}</title>
  <link rel="stylesheet" href="/static/hub.css" />
</head>
<body>
  <main class="app" data-uid="{{UID}}">
    <header>
      <h1>Hello, {{NAME}}</h1>
      {{WELCOME}}
    </header>
    <section class="panel">
      <div class="stat"><span class="label">Today</span><span class="value">{{DATE}}</span></div>
      <div class="stat"><span class="label">Current streak</span><span class="value">{{CURRENT}}</span></div>
      <div class="stat"><span class="label">Best streak</span><span class="value">{{BEST}}</span></div>
      <div class="stat"><span class="label">Challenges</span><span class="value">{{COUNT}}</span></div>
    </section>
    <section class="panel">
      {{CHALLENGES}}
    </section>
    <section class="stat">
      <span class="label">Today's reflection</span>
      <p class="hint">{{REFLECTION}}</p>
    </section>
    <p class="hint" id="status"></p>
  </main>
  <script>
    const root = document.querySelector('.app');
    const statusEl = document.getElementById('status');
    document.querySelectorAll('button[data-id]').forEach((button) => {
      button.addEventListener('click', async () => {
        const url = `/api/users/${root.dataset.uid}/challenges/${button.dataset.id}/complete`;
        const res = await fetch(url, {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({ note: '' })
        });
        if (!res.ok) {
          statusEl.textContent = await res.text();
          return;
        }
        const body = await res.json();
        if (body.milestone) {
          alert(`${body.milestone.title}: ${body.milestone.description} (${body.milestone.percentage}% complete)`);
        }
        window.location.reload();
      });
    });
  </script>
</body>
</html>
"#;

pub fn stylesheet() -> &'static str {
    STYLE
}
