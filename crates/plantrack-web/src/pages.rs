//! HTML rendering. Handlers assemble context values and hand them here;
//! nothing in this module touches the database. All interpolated user data
//! goes through [`escape`].

use plantrack_db::models::{Plan, PlanWithOwner, TaskWithNames, User};

use crate::util::urlencode;

/// Escape text for interpolation into HTML.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

fn layout(title: &str, user: Option<&User>, flash: Option<&str>, body: &str) -> String {
    let nav_auth = match user {
        Some(u) => format!(
            "<span>{}</span> <form method=\"post\" action=\"/logout\" style=\"display:inline\">\
             <button type=\"submit\">Log out</button></form>",
            escape(&u.username)
        ),
        None => "<a href=\"/login\">Log in</a>".to_owned(),
    };
    let flash_banner = match flash {
        Some(msg) => format!("<p class=\"flash\">{}</p>", escape(msg)),
        None => String::new(),
    };
    format!(
        "<!DOCTYPE html>\
<html><head><title>{title} - plantrack</title></head><body>\
<nav><a href=\"/\">plantrack</a> | <a href=\"/plans\">Plans</a> | \
<a href=\"/tasks\">Tasks</a> | {nav_auth}</nav>\
{flash_banner}\
<h1>{title}</h1>\
{body}\
</body></html>",
        title = escape(title),
    )
}

/// Landing page with object counts.
pub fn index_page(
    user: Option<&User>,
    flash: Option<&str>,
    users_count: i64,
    plans_count: i64,
    tasks_count: i64,
) -> String {
    let body = format!(
        "<ul>\
<li>Users: {users_count}</li>\
<li>Plans: <a href=\"/plans\">{plans_count}</a></li>\
<li>Tasks: <a href=\"/tasks\">{tasks_count}</a></li>\
</ul>"
    );
    layout("plantrack", user, flash, &body)
}

fn owner_select(users: &[User], selected: Option<&str>) -> String {
    let mut options = String::from("<option value=\"\">all owners</option>");
    for u in users {
        let sel = if Some(u.username.as_str()) == selected {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            "<option value=\"{v}\"{sel}>{v}</option>",
            v = escape(&u.username)
        ));
    }
    options
}

/// Plan list with the owner filter form.
pub fn plan_list_page(
    user: Option<&User>,
    flash: Option<&str>,
    plans: &[PlanWithOwner],
    users: &[User],
    selected_owner: Option<&str>,
) -> String {
    let filter_form = format!(
        "<form method=\"get\" action=\"/plans\">\
<select name=\"owner\">{}</select>\
<button type=\"submit\">Filter</button></form>",
        owner_select(users, selected_owner)
    );

    let rows = if plans.is_empty() {
        "<tr><td colspan=\"3\">No plans found.</td></tr>".to_owned()
    } else {
        plans
            .iter()
            .map(|p| {
                format!(
                    "<tr><td><a href=\"/plans/{id}\">{name}</a></td><td>{owner}</td>\
                     <td><a href=\"/plans/{id}/edit\">edit</a> \
                     <a href=\"/plans/{id}/delete\">delete</a></td></tr>",
                    id = p.id,
                    name = escape(&p.name),
                    owner = escape(&p.owner_username),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let body = format!(
        "{filter_form}\
<p><a href=\"/plans/new\">New plan</a></p>\
<table><tr><th>Plan</th><th>Owner</th><th></th></tr>{rows}</table>"
    );
    layout("Plans", user, flash, &body)
}

/// Single plan record.
pub fn plan_detail_page(user: Option<&User>, flash: Option<&str>, plan: &PlanWithOwner) -> String {
    let body = format!(
        "<dl>\
<dt>Name</dt><dd>{name}</dd>\
<dt>Owner</dt><dd>{owner}</dd>\
<dt>Created</dt><dd>{created}</dd>\
</dl>\
<p><a href=\"/tasks?plan={id}\">Tasks in this plan</a></p>\
<p><a href=\"/plans/{id}/edit\">Edit</a> <a href=\"/plans/{id}/delete\">Delete</a></p>",
        id = plan.id,
        name = escape(&plan.name),
        owner = escape(&plan.owner_username),
        created = plan.created_at.format("%Y-%m-%d %H:%M"),
    );
    layout(&plan.name, user, flash, &body)
}

/// Shared create/edit form. `error` renders inline above the form.
pub fn plan_form_page(
    user: Option<&User>,
    flash: Option<&str>,
    title: &str,
    action: &str,
    name_value: Option<&str>,
    error: Option<&str>,
) -> String {
    let error_html = match error {
        Some(msg) => format!("<p class=\"error\">{}</p>", escape(msg)),
        None => String::new(),
    };
    let body = format!(
        "{error_html}\
<form method=\"post\" action=\"{action}\">\
<label>Name <input type=\"text\" name=\"name\" value=\"{value}\"></label>\
<button type=\"submit\">Save</button></form>\
<p><a href=\"/plans\">Back to plans</a></p>",
        action = escape(action),
        value = escape(name_value.unwrap_or("")),
    );
    layout(title, user, flash, &body)
}

/// Delete confirmation form.
pub fn plan_delete_page(user: Option<&User>, flash: Option<&str>, plan: &Plan) -> String {
    let body = format!(
        "<p>Delete plan <strong>{name}</strong> and all of its tasks?</p>\
<form method=\"post\" action=\"/plans/{id}/delete\">\
<button type=\"submit\">Delete</button></form>\
<p><a href=\"/plans\">Cancel</a></p>",
        id = plan.id,
        name = escape(&plan.name),
    );
    layout("Delete plan", user, flash, &body)
}

/// Task list with the composable filter form. `next` is the current URI,
/// threaded through the done-toggle so it returns here.
#[allow(clippy::too_many_arguments)]
pub fn task_list_page(
    user: Option<&User>,
    flash: Option<&str>,
    tasks: &[TaskWithNames],
    plans: &[PlanWithOwner],
    users: &[User],
    selected_owner: Option<&str>,
    selected_plan: Option<&str>,
    search_name: Option<&str>,
    next: &str,
) -> String {
    let mut plan_options = String::from("<option value=\"\">all plans</option>");
    for p in plans {
        let id = p.id.to_string();
        let sel = if Some(id.as_str()) == selected_plan {
            " selected"
        } else {
            ""
        };
        plan_options.push_str(&format!(
            "<option value=\"{id}\"{sel}>{name}</option>",
            name = escape(&p.name)
        ));
    }

    let filter_form = format!(
        "<form method=\"get\" action=\"/tasks\">\
<select name=\"owner\">{owners}</select>\
<select name=\"plan\">{plan_options}</select>\
<input type=\"text\" name=\"search_name\" value=\"{search}\" placeholder=\"name contains\">\
<button type=\"submit\">Filter</button></form>",
        owners = owner_select(users, selected_owner),
        search = escape(search_name.unwrap_or("")),
    );

    let rows = if tasks.is_empty() {
        "<tr><td colspan=\"4\">No tasks found.</td></tr>".to_owned()
    } else {
        tasks
            .iter()
            .map(|t| {
                let mark = if t.is_done { "done" } else { "open" };
                format!(
                    "<tr><td>{mark}</td>\
                     <td><a href=\"/tasks/{id}\">{name}</a></td>\
                     <td><a href=\"/plans/{plan_id}\">{plan}</a></td>\
                     <td>{owner}</td>\
                     <td><form method=\"post\" action=\"/tasks/{id}/done?next={next}\">\
                     <button type=\"submit\">toggle</button></form></td></tr>",
                    id = t.id,
                    plan_id = t.plan_id,
                    name = escape(&t.name),
                    plan = escape(&t.plan_name),
                    owner = escape(&t.owner_username),
                    next = urlencode(next),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let body = format!(
        "{filter_form}\
<table><tr><th>Status</th><th>Task</th><th>Plan</th><th>Owner</th><th></th></tr>{rows}</table>"
    );
    layout("Tasks", user, flash, &body)
}

/// Single task record with its toggle form.
pub fn task_detail_page(user: Option<&User>, flash: Option<&str>, task: &TaskWithNames) -> String {
    let state = if task.is_done { "done" } else { "undone" };
    let body = format!(
        "<dl>\
<dt>Name</dt><dd>{name}</dd>\
<dt>Plan</dt><dd><a href=\"/plans/{plan_id}\">{plan}</a></dd>\
<dt>Owner</dt><dd>{owner}</dd>\
<dt>Status</dt><dd>{state}</dd>\
<dt>Created</dt><dd>{created}</dd>\
</dl>\
<form method=\"post\" action=\"/tasks/{id}/done?next={next}\">\
<button type=\"submit\">Mark {opposite}</button></form>\
<p><a href=\"/tasks\">Back to tasks</a></p>",
        id = task.id,
        plan_id = task.plan_id,
        name = escape(&task.name),
        plan = escape(&task.plan_name),
        owner = escape(&task.owner_username),
        created = task.created_at.format("%Y-%m-%d %H:%M"),
        next = urlencode(&format!("/tasks/{}", task.id)),
        opposite = if task.is_done { "undone" } else { "done" },
    );
    layout(&task.name, user, flash, &body)
}

/// Login form. `error` renders inline; `next` rides along as a hidden field.
pub fn login_page(
    user: Option<&User>,
    flash: Option<&str>,
    next: Option<&str>,
    error: Option<&str>,
) -> String {
    let error_html = match error {
        Some(msg) => format!("<p class=\"error\">{}</p>", escape(msg)),
        None => String::new(),
    };
    let next_field = match next {
        Some(n) if !n.is_empty() => format!(
            "<input type=\"hidden\" name=\"next\" value=\"{}\">",
            escape(n)
        ),
        _ => String::new(),
    };
    let body = format!(
        "{error_html}\
<form method=\"post\" action=\"/login\">\
<label>Username <input type=\"text\" name=\"username\"></label>\
{next_field}\
<button type=\"submit\">Log in</button></form>"
    );
    layout("Log in", user, flash, &body)
}

/// Error page shared by the 4xx/5xx responses.
pub fn error_page(title: &str, message: &str) -> String {
    let body = format!("<p>{}</p>", escape(message));
    layout(title, None, None, &body)
}
