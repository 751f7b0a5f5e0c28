//! 单次命令：list / add / toggle / rm，执行完毕后按渲染顺序打印任务列表

use std::io::Write;

use tasklist_core::api::{
    AddOutcome, ClientConfig, CliError, DeleteFailure, Task, TaskApi, TaskClient, TaskId,
};
use tasklist_plugins::api::HttpTaskApi;
use tasklist_plugins::factory::build_api;

use super::cli::{AddArgs, ListArgs, RmArgs, ToggleArgs};

fn client_error(err: anyhow::Error) -> CliError {
    CliError::Client(format!("{err:#}"))
}

/// 构建 HTTP 客户端并完成首次加载
pub async fn connect(cfg: &ClientConfig) -> Result<TaskClient<HttpTaskApi>, CliError> {
    let api = build_api(cfg).map_err(client_error)?;
    let mut client = TaskClient::new(api);
    client.load().await.map_err(client_error)?;
    Ok(client)
}

pub fn format_task(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    format!("[{mark}] {}  ({})", task.text, task.id)
}

pub fn print_view<A: TaskApi>(client: &TaskClient<A>, out: &mut impl Write) -> Result<(), CliError> {
    let visible = client.visible();
    if visible.is_empty() {
        writeln!(out, "No tasks")?;
    }
    for task in visible {
        writeln!(out, "{}", format_task(task))?;
    }
    Ok(())
}

pub fn handle_list<A: TaskApi>(
    client: &mut TaskClient<A>,
    args: &ListArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if args.hide_completed && !client.view().hide_completed() {
        client.toggle_hide_completed();
    }
    print_view(client, out)
}

pub async fn handle_add<A: TaskApi>(
    client: &mut TaskClient<A>,
    args: &AddArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let text = args.text.join(" ");
    match client.add(&text).await.map_err(client_error)? {
        AddOutcome::Rejected => Err(CliError::Client("Task text cannot be empty".to_string())),
        AddOutcome::Added(task) => {
            writeln!(out, "Added {}", task.id)?;
            print_view(client, out)
        }
    }
}

pub async fn handle_toggle<A: TaskApi>(
    client: &mut TaskClient<A>,
    args: &ToggleArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let task = client
        .toggle(&TaskId::new(args.id.trim()))
        .await
        .map_err(client_error)?;
    let state = if task.completed { "completed" } else { "not completed" };
    writeln!(out, "Marked {} as {state}", task.id)?;
    print_view(client, out)
}

/// 通过编辑模式的选择集批量删除；本地列表中不存在的 id 记为已删除，
/// 其余 id 照常删除，存在失败时打印结果后以错误退出
pub async fn handle_rm<A: TaskApi>(
    client: &mut TaskClient<A>,
    args: &RmArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    client.enter_edit();
    let mut missing = Vec::new();
    for raw in &args.ids {
        let id = TaskId::new(raw.trim());
        if client.find(&id).is_none() {
            if !missing.contains(&id) {
                missing.push(id);
            }
            continue;
        }
        if !client.view().is_selected(&id) {
            client.toggle_select(&id).map_err(client_error)?;
        }
    }

    let mut report = client.bulk_delete().await.map_err(client_error)?;
    report
        .failed
        .extend(missing.into_iter().map(|id| (id, DeleteFailure::AlreadyDeleted)));

    for id in &report.deleted {
        writeln!(out, "Deleted {id}")?;
    }
    print_view(client, out)?;

    if report.is_clean() {
        return Ok(());
    }
    let failed: Vec<String> = report
        .failed
        .iter()
        .map(|(id, why)| format!("{id}: {why}"))
        .collect();
    Err(CliError::Client(format!(
        "failed to delete {} task(s): {}",
        failed.len(),
        failed.join("; ")
    )))
}
