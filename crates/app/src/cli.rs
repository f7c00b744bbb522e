use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vasool")]
#[command(about = "Track shared expenses and who owes what")]
pub struct Cli {
    /// Optional settings file path (TOML).
    #[arg(long)]
    pub config: Option<String>,

    /// Act as this member (overrides `member` from the settings).
    #[arg(long = "as", value_name = "MEMBER_ID")]
    pub acting_member: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Member(Member),
    Expense(Expense),
    /// Show who owes whom across pending splits.
    Balances,
}

#[derive(Args, Debug)]
pub struct Member {
    #[command(subcommand)]
    pub command: MemberCommand,
}

#[derive(Subcommand, Debug)]
pub enum MemberCommand {
    Add(MemberAddArgs),
    List,
}

#[derive(Args, Debug)]
pub struct MemberAddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub admin: bool,
    /// The member cannot owe money; their shares go to the guardian.
    #[arg(long)]
    pub proxy: bool,
    #[arg(long, requires = "proxy")]
    pub guardian: Option<String>,
}

#[derive(Args, Debug)]
pub struct Expense {
    #[command(subcommand)]
    pub command: ExpenseCommand,
}

#[derive(Subcommand, Debug)]
pub enum ExpenseCommand {
    Add(ExpenseAddArgs),
    Show(ExpenseShowArgs),
    List(ExpenseListArgs),
}

#[derive(Args, Debug)]
pub struct ExpenseAddArgs {
    #[arg(long)]
    pub description: String,
    /// Total amount, e.g. `10.00` or `10,5`.
    #[arg(long)]
    pub amount: String,
    /// Consumer member id (repeatable). The payer is included unless
    /// `--exclude-self` is given.
    #[arg(long = "consumer", value_name = "MEMBER_ID")]
    pub consumers: Vec<String>,
    /// Re-assign a proxy consumer's share (repeatable).
    #[arg(long = "responsible", value_name = "CONSUMER_ID=MEMBER_ID")]
    pub responsible: Vec<String>,
    #[arg(long)]
    pub exclude_self: bool,
}

#[derive(Args, Debug)]
pub struct ExpenseShowArgs {
    pub id: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExpenseListArgs {
    #[arg(long)]
    pub json: bool,
}
