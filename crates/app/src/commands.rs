//! Command handlers. Each one resolves ids, calls the engine and prints the
//! result.

use engine::{Directory, Draft, Engine, Expense, MoneyCents, NewMemberCmd, SubmitExpenseCmd};
use uuid::Uuid;

use crate::{
    cli::{Command, ExpenseAddArgs, ExpenseCommand, MemberAddArgs, MemberCommand},
    error::{AppError, Result},
};

pub async fn run(engine: &Engine, command: Command, acting: Option<&str>) -> Result<()> {
    match command {
        Command::Member(member) => match member.command {
            MemberCommand::Add(args) => add_member(engine, args).await,
            MemberCommand::List => list_members(engine).await,
        },
        Command::Expense(expense) => match expense.command {
            ExpenseCommand::Add(args) => {
                let payer_id = current_member(acting)?;
                add_expense(engine, payer_id, args).await
            }
            ExpenseCommand::Show(args) => {
                let expense = engine.expense(parse_id(&args.id, "expense")?).await?;
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&expense)?);
                } else {
                    let directory = engine.directory().await?;
                    print_expense(&expense, &directory);
                }
                Ok(())
            }
            ExpenseCommand::List(args) => {
                let expenses = engine.list_expenses().await?;
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&expenses)?);
                } else {
                    let directory = engine.directory().await?;
                    for expense in &expenses {
                        println!(
                            "{}  {}  {}  paid by {}",
                            expense.id,
                            expense.created_at.format("%Y-%m-%d"),
                            expense.total,
                            name(&directory, expense.payer_id)
                        );
                    }
                }
                Ok(())
            }
        },
        Command::Balances => balances(engine).await,
    }
}

/// Resolves who is acting; the session itself lives outside this tool.
fn current_member(acting: Option<&str>) -> Result<Uuid> {
    let raw = acting.ok_or(AppError::Unauthenticated)?;
    parse_id(raw, "member")
}

fn parse_id(raw: &str, label: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidArgument(format!("invalid {label} id: {raw}")))
}

/// Parses `CONSUMER_ID=MEMBER_ID`.
fn parse_override(raw: &str) -> Result<(Uuid, Uuid)> {
    let (consumer, responsible) = raw.split_once('=').ok_or_else(|| {
        AppError::InvalidArgument(format!("expected CONSUMER_ID=MEMBER_ID, got {raw}"))
    })?;
    Ok((
        parse_id(consumer, "consumer")?,
        parse_id(responsible, "responsible")?,
    ))
}

fn name(directory: &Directory, id: Uuid) -> String {
    directory
        .get(id)
        .map(|member| member.display_name.clone())
        .unwrap_or_else(|| id.to_string())
}

async fn add_member(engine: &Engine, args: MemberAddArgs) -> Result<()> {
    let cmd = if args.proxy {
        let guardian = args
            .guardian
            .as_deref()
            .map(|raw| parse_id(raw, "guardian"))
            .transpose()?;
        NewMemberCmd::proxy(args.name, guardian)
    } else {
        NewMemberCmd::new(args.name)
    };
    let id = engine.add_member(cmd.admin(args.admin)).await?;
    tracing::info!("member {id} registered");
    println!("{id}");
    Ok(())
}

async fn list_members(engine: &Engine) -> Result<()> {
    let directory = engine.directory().await?;
    for member in directory.members() {
        let mut line = format!("{}  {}", member.id, member.display_name);
        if member.is_admin {
            line.push_str("  [admin]");
        }
        if member.is_proxy {
            match member.guardian() {
                Some(guardian) => {
                    line.push_str(&format!("  [proxy of {}]", name(&directory, guardian)))
                }
                None => line.push_str("  [proxy]"),
            }
        }
        println!("{line}");
    }
    Ok(())
}

async fn add_expense(engine: &Engine, payer_id: Uuid, args: ExpenseAddArgs) -> Result<()> {
    let total: MoneyCents = args.amount.parse()?;
    let directory = engine.directory().await?;

    let mut draft = if args.exclude_self {
        Draft::new(Some(payer_id))
    } else {
        Draft::for_payer(payer_id, &directory)?
    };
    for raw in &args.consumers {
        draft.select(parse_id(raw, "consumer")?, &directory)?;
    }
    for raw in &args.responsible {
        let (consumer_id, responsible_id) = parse_override(raw)?;
        draft.set_responsible_party(consumer_id, responsible_id, &directory)?;
    }
    draft.redistribute(total);

    let expense_id = engine
        .submit(SubmitExpenseCmd::from_draft(args.description, total, draft))
        .await?;
    tracing::info!("expense {expense_id} recorded");

    let expense = engine.expense(expense_id).await?;
    print_expense(&expense, &directory);
    Ok(())
}

fn print_expense(expense: &Expense, directory: &Directory) {
    println!("{}  {}", expense.id, expense.description);
    println!(
        "{} paid by {} ({})",
        expense.total,
        name(directory, expense.payer_id),
        expense.status.as_str()
    );
    for split in &expense.splits {
        if split.responsible_id == split.consumer_id {
            println!("  {} owes {}", name(directory, split.consumer_id), split.amount);
        } else {
            println!(
                "  {} owes {} for {}",
                name(directory, split.responsible_id),
                split.amount,
                name(directory, split.consumer_id)
            );
        }
    }
}

async fn balances(engine: &Engine) -> Result<()> {
    let directory = engine.directory().await?;
    let debts = engine.outstanding_debts().await?;
    if debts.is_empty() {
        println!("All settled.");
    }
    for debt in debts {
        println!(
            "{} owes {} {}",
            name(&directory, debt.debtor_id),
            name(&directory, debt.creditor_id),
            debt.amount
        );
    }
    Ok(())
}
