mod render;
mod terminal;

use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use client_core::{
    config::load_settings_file, ClientError, ConfirmPrompt, EntryDraft, EntryForm, EntryList,
    FixedAnswer, HttpGateway, Notifier, PersonDraft, PersonForm, PersonList, RecordEvents,
    RecordGateway, Session, Settings, StatusToggle,
};
use rust_decimal::Decimal;
use shared::{
    domain::{CategoryId, CategoryRef, EntryId, EntryKind, PersonId, PersonRef},
    protocol::SortSpec,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::terminal::{StdinPrompt, TerminalNotifier};

#[derive(Parser, Debug)]
#[command(name = "console", about = "Ledger administration console")]
struct Cli {
    /// Backend base URL; overrides console.toml and LEDGER_API_URL.
    #[arg(long)]
    api_url: Option<String>,
    /// Bearer token; falls back to LEDGER_TOKEN.
    #[arg(long)]
    token: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Entries {
        #[command(subcommand)]
        action: EntryAction,
    },
    People {
        #[command(subcommand)]
        action: PersonAction,
    },
}

#[derive(Args, Debug)]
struct Paging {
    #[arg(long, default_value_t = 0)]
    page: u32,
    #[arg(long)]
    size: Option<u32>,
    /// `field` or `field,asc|desc`
    #[arg(long)]
    sort: Option<String>,
}

#[derive(Subcommand, Debug)]
enum EntryAction {
    List {
        #[arg(long)]
        descricao: Option<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[command(flatten)]
        paging: Paging,
    },
    Show {
        id: i64,
    },
    Create(EntryFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: EntryFields,
    },
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct EntryFields {
    /// RECEITA or DESPESA
    #[arg(long)]
    tipo: Option<String>,
    #[arg(long)]
    vencimento: Option<NaiveDate>,
    #[arg(long)]
    pagamento: Option<NaiveDate>,
    #[arg(long)]
    descricao: Option<String>,
    #[arg(long)]
    valor: Option<Decimal>,
    #[arg(long)]
    categoria: Option<i64>,
    #[arg(long)]
    pessoa: Option<i64>,
    #[arg(long)]
    observacao: Option<String>,
}

impl EntryFields {
    fn kind(&self) -> Result<Option<EntryKind>> {
        match self.tipo.as_deref().map(str::trim) {
            None => Ok(None),
            Some(t) if t.eq_ignore_ascii_case("receita") => Ok(Some(EntryKind::Receita)),
            Some(t) if t.eq_ignore_ascii_case("despesa") => Ok(Some(EntryKind::Despesa)),
            Some(other) => bail!("unknown entry kind '{other}', expected RECEITA or DESPESA"),
        }
    }

    fn apply(&self, kind: Option<EntryKind>, draft: &mut EntryDraft) {
        if kind.is_some() {
            draft.kind = kind;
        }
        if let Some(d) = self.vencimento {
            draft.due_date = Some(d);
        }
        if let Some(d) = self.pagamento {
            draft.payment_date = Some(d);
        }
        if let Some(text) = &self.descricao {
            draft.description = text.clone();
        }
        if let Some(v) = self.valor {
            draft.amount = Some(v);
        }
        if let Some(id) = self.categoria {
            draft.category = Some(CategoryRef {
                id: CategoryId(id),
                name: None,
            });
        }
        if let Some(id) = self.pessoa {
            draft.person = Some(PersonRef {
                id: PersonId(id),
                name: None,
            });
        }
        if let Some(text) = &self.observacao {
            draft.notes = Some(text.clone());
        }
    }
}

#[derive(Subcommand, Debug)]
enum PersonAction {
    List {
        #[arg(long)]
        nome: Option<String>,
        #[command(flatten)]
        paging: Paging,
    },
    Show {
        id: i64,
    },
    Create(PersonFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: PersonFields,
    },
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Flips the active flag.
    Toggle {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct PersonFields {
    #[arg(long)]
    nome: Option<String>,
    #[arg(long)]
    logradouro: Option<String>,
    #[arg(long)]
    numero: Option<String>,
    #[arg(long)]
    complemento: Option<String>,
    #[arg(long)]
    bairro: Option<String>,
    #[arg(long)]
    cep: Option<String>,
    #[arg(long)]
    cidade: Option<String>,
    #[arg(long)]
    estado: Option<String>,
}

impl PersonFields {
    fn apply(&self, draft: &mut PersonDraft) {
        if let Some(name) = &self.nome {
            draft.name = name.clone();
        }
        let address = &mut draft.address;
        for (value, slot) in [
            (&self.logradouro, &mut address.street),
            (&self.numero, &mut address.number),
            (&self.complemento, &mut address.complement),
            (&self.bairro, &mut address.district),
            (&self.cep, &mut address.postal_code),
            (&self.cidade, &mut address.city),
            (&self.estado, &mut address.state),
        ] {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }
    }
}

struct App {
    settings: Settings,
    gateway: Arc<HttpGateway>,
    notifier: Arc<dyn Notifier>,
    events: RecordEvents,
}

impl App {
    fn prompt(yes: bool) -> Box<dyn ConfirmPrompt> {
        if yes {
            Box::new(FixedAnswer(true))
        } else {
            Box::new(StdinPrompt)
        }
    }

    fn sorted<F: client_core::ListFilter>(filter: &mut F, sort: Option<&str>) -> Result<()> {
        if let Some(raw) = sort {
            let spec = SortSpec::parse(raw).with_context(|| format!("invalid sort '{raw}'"))?;
            filter.set_sort(Some(spec));
        }
        Ok(())
    }

    fn entry_list(&self) -> Arc<EntryList> {
        EntryList::from_settings(self.gateway.clone(), self.notifier.clone(), &self.settings)
    }

    fn person_list(&self) -> Arc<PersonList> {
        PersonList::from_settings(self.gateway.clone(), self.notifier.clone(), &self.settings)
    }

    async fn entries(&self, action: EntryAction) -> Result<()> {
        match action {
            EntryAction::List {
                descricao,
                from,
                to,
                paging,
            } => {
                let list = self.entry_list();
                let mut sort_error = None;
                list.update_filter(|f| {
                    f.set_description(descricao.unwrap_or_default());
                    f.set_date_range(from, to);
                    sort_error = Self::sorted(f, paging.sort.as_deref()).err();
                })
                .await;
                if let Some(err) = sort_error {
                    return Err(err);
                }
                list.go_to_page(paging.page, paging.size.unwrap_or(0)).await?;
                print!("{}", render::entries(&list.result().await));
            }
            EntryAction::Show { id } => {
                let entry = RecordGateway::<client_core::Entries>::fetch(
                    self.gateway.as_ref(),
                    EntryId(id),
                )
                .await
                .with_context(|| format!("could not load entry {id}"))?;
                println!("{}", serde_json::to_string_pretty(&entry)?);
            }
            EntryAction::Create(fields) => self.save_entry(None, fields).await?,
            EntryAction::Update { id, fields } => self.save_entry(Some(EntryId(id)), fields).await?,
            EntryAction::Delete { id, yes } => {
                let prompt = Self::prompt(yes);
                self.entry_list()
                    .delete(EntryId(id), &*prompt)
                    .await?;
            }
        }
        Ok(())
    }

    async fn save_entry(&self, id: Option<EntryId>, fields: EntryFields) -> Result<()> {
        let kind = fields.kind()?;
        let form = EntryForm::new(self.gateway.clone(), self.notifier.clone(), self.events.clone());
        form.load(id).await?;
        form.edit(|draft| fields.apply(kind, draft)).await;
        let saved = form.submit().await.map_err(explain)?;
        println!("{}", serde_json::to_string_pretty(&saved)?);
        Ok(())
    }

    async fn people(&self, action: PersonAction) -> Result<()> {
        match action {
            PersonAction::List { nome, paging } => {
                let list = self.person_list();
                let mut sort_error = None;
                list.update_filter(|f| {
                    f.set_name(nome.unwrap_or_default());
                    sort_error = Self::sorted(f, paging.sort.as_deref()).err();
                })
                .await;
                if let Some(err) = sort_error {
                    return Err(err);
                }
                list.go_to_page(paging.page, paging.size.unwrap_or(0)).await?;
                print!("{}", render::people(&list.result().await));
            }
            PersonAction::Show { id } => {
                let person = self.fetch_person(id).await?;
                println!("{}", serde_json::to_string_pretty(&person)?);
            }
            PersonAction::Create(fields) => self.save_person(None, fields).await?,
            PersonAction::Update { id, fields } => {
                self.save_person(Some(PersonId(id)), fields).await?
            }
            PersonAction::Delete { id, yes } => {
                let prompt = Self::prompt(yes);
                self.person_list()
                    .delete(PersonId(id), &*prompt)
                    .await?;
            }
            PersonAction::Toggle { id } => {
                let person = self.fetch_person(id).await?;
                let toggle = StatusToggle::new(self.gateway.clone(), self.person_list());
                let active = toggle.toggle(&person).await?;
                debug!(%id, active, "status toggled");
            }
        }
        Ok(())
    }

    async fn fetch_person(&self, id: i64) -> Result<shared::domain::Person> {
        RecordGateway::<client_core::People>::fetch(self.gateway.as_ref(), PersonId(id))
            .await
            .with_context(|| format!("could not load person {id}"))
    }

    async fn save_person(&self, id: Option<PersonId>, fields: PersonFields) -> Result<()> {
        let form = PersonForm::new(self.gateway.clone(), self.notifier.clone(), self.events.clone());
        form.load(id).await?;
        form.edit(|draft| fields.apply(draft)).await;
        let saved = form.submit().await.map_err(explain)?;
        println!("{}", serde_json::to_string_pretty(&saved)?);
        Ok(())
    }
}

/// Spells out validation failures field by field.
fn explain(err: ClientError) -> anyhow::Error {
    match err {
        ClientError::Validation(report) => {
            for violation in report.violations() {
                eprintln!("  {} {}", violation.field, violation.rule);
            }
            anyhow::anyhow!("record not saved: {report}")
        }
        other => other.into(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => load_settings_file(path),
        None => client_core::load_settings(),
    };
    if let Some(url) = cli.api_url {
        settings.api_url = url;
    }

    let token = cli
        .token
        .or_else(|| std::env::var("LEDGER_TOKEN").ok())
        .filter(|t| !t.trim().is_empty())
        .context("no credential: pass --token or set LEDGER_TOKEN")?;
    let session = Session::new();
    session.sign_in(token.trim());

    let gateway = HttpGateway::from_settings(&settings, session)
        .context("could not set up the backend client")?;
    let app = App {
        settings,
        gateway: Arc::new(gateway),
        notifier: Arc::new(TerminalNotifier),
        events: RecordEvents::new(),
    };

    match cli.command {
        Command::Entries { action } => app.entries(action).await,
        Command::People { action } => app.people(action).await,
    }
}
