//! Message rendering.
//!
//! Turns a classified candidate event into the final notification text in
//! the HTML markup subset (`<b>`, `<a href>`). Amounts are resolved through
//! the denomination rules, addresses through the account directory, and the
//! optional memo through the REST collaborator. Every enrichment failure
//! degrades to a safe default; rendering itself never fails.

use std::sync::Arc;

use crate::{
	models::{
		CandidateEvent, ChainConfig, ExplorerConfig, ForeignAsset, FormattedMessage,
		NamedAddress, ReferenceData, RestakeLeg,
	},
	services::{
		enrichment::{AccountDirectory, EnrichmentProvider},
		renderer::amounts::{format_grouped, round2, split_amount_denom, DenomTotaler},
	},
};

/// Rendered in place of any amount whose denom cannot be resolved.
pub const UNKNOWN_IBC: &str = "Unknown IBC";

/// Prefix of content-hash denoms minted for assets bridged over IBC.
pub const IBC_DENOM_PREFIX: &str = "ibc/";

/// Renders candidate events into formatted notification messages.
pub struct MessageRenderer<E> {
	chain: ChainConfig,
	explorer: ExplorerConfig,
	/// Uppercase display currency ticker, e.g. "USD".
	currency: String,
	foreign_assets: Vec<ForeignAsset>,
	refs: Arc<ReferenceData>,
	enrichment: Arc<E>,
	directory: AccountDirectory<E>,
}

impl<E: EnrichmentProvider> MessageRenderer<E> {
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		chain: ChainConfig,
		explorer: ExplorerConfig,
		currency: &str,
		foreign_assets: Vec<ForeignAsset>,
		named_addresses: Vec<NamedAddress>,
		refs: Arc<ReferenceData>,
		enrichment: Arc<E>,
	) -> Self {
		let directory = AccountDirectory::new(
			chain.bech32_prefix.clone(),
			named_addresses,
			refs.clone(),
			enrichment.clone(),
		);
		Self {
			chain,
			explorer,
			currency: currency.to_uppercase(),
			foreign_assets,
			refs,
			enrichment,
			directory,
		}
	}

	/// Renders one candidate into a formatted message.
	pub async fn render(&self, event: &CandidateEvent) -> FormattedMessage {
		let category = event.category();
		let (text, primary_amount) = match event {
			CandidateEvent::Transfer {
				sender,
				recipient,
				amount,
				tx_hash,
			} => {
				let text = format!(
					"💸 <b>Transfer</b> 💸\n\n{} ➡️ {}\n{}{}",
					self.account_link(sender).await,
					self.account_link(recipient).await,
					self.tx_link(tx_hash, amount).await,
					self.memo_line(tx_hash).await,
				);
				(text, Some(amount.clone()))
			}
			CandidateEvent::IbcTransferOut {
				sender,
				receiver,
				amount,
				tx_hash,
			} => {
				let text = format!(
					"🌉 <b>IBC Transfer Out</b> 🌉\n\n{} ➡️ {}\n{}{}",
					self.account_link(sender).await,
					self.account_link(receiver).await,
					self.tx_link(tx_hash, amount).await,
					self.memo_line(tx_hash).await,
				);
				(text, Some(amount.clone()))
			}
			CandidateEvent::IbcTransferIn {
				sender,
				recipient,
				amount,
				tx_hash,
			} => {
				let text = format!(
					"🌉 <b>IBC Transfer In</b> 🌉\n\n{} ➡️ {}\n{}{}",
					self.account_link(sender).await,
					self.account_link(recipient).await,
					self.tx_link(tx_hash, amount).await,
					self.memo_line(tx_hash).await,
				);
				(text, Some(amount.clone()))
			}
			CandidateEvent::WithdrawRewards {
				delegator,
				validator,
				amount,
				tx_hash,
			} => {
				let text = format!(
					"💰 <b>Withdraw Rewards</b> 💰\n\n{} ⬅️ {}\n{}",
					self.account_link(delegator).await,
					self.account_link(validator).await,
					self.tx_link(tx_hash, amount).await,
				);
				(text, Some(amount.clone()))
			}
			CandidateEvent::WithdrawCommission {
				validator,
				amount,
				tx_hash,
			} => {
				let text = format!(
					"💰 <b>Withdraw Commission</b> 💰\n\n{}\n{}",
					self.account_link(validator).await,
					self.tx_link(tx_hash, amount).await,
				);
				(text, Some(amount.clone()))
			}
			CandidateEvent::Delegate {
				delegator,
				validator,
				amount,
				tx_hash,
			} => {
				let text = format!(
					"⚡ <b>Delegation</b> ⚡\n\n{} ➡️ {}\n{}",
					self.account_link(delegator).await,
					self.account_link(validator).await,
					self.tx_link(tx_hash, amount).await,
				);
				(text, Some(amount.clone()))
			}
			CandidateEvent::Undelegate {
				delegator,
				validator,
				amount,
				tx_hash,
			} => {
				let text = format!(
					"🔓 <b>Undelegation</b> 🔓\n\n{} ⬅️ {}\n{}",
					self.account_link(delegator).await,
					self.account_link(validator).await,
					self.tx_link(tx_hash, amount).await,
				);
				(text, Some(amount.clone()))
			}
			CandidateEvent::Redelegate {
				delegator,
				source_validator,
				destination_validator,
				amount,
				tx_hash,
			} => {
				let text = format!(
					"🔄 <b>Redelegation</b> 🔄\n\n{}\n{} ➡️ {}\n{}",
					self.account_link(delegator).await,
					self.account_link(source_validator).await,
					self.account_link(destination_validator).await,
					self.tx_link(tx_hash, amount).await,
				);
				(text, Some(amount.clone()))
			}
			CandidateEvent::Restake {
				validator,
				legs,
				tx_hash,
			} => {
				let (text, total) = self.render_restake(validator, legs, tx_hash).await;
				(text, Some(total))
			}
			CandidateEvent::RegisterAccount {
				account,
				domain,
				registerer,
				tx_hash,
			} => {
				let text = format!(
					"📖 <b>Register Account</b> 📖\n\n{} registered {}\n{}",
					self.account_link(registerer).await,
					starname(account, domain),
					self.tx_link_labeled(tx_hash, "TX"),
				);
				(text, None)
			}
			CandidateEvent::RegisterDomain {
				domain,
				registerer,
				tx_hash,
			} => {
				let text = format!(
					"📖 <b>Register Domain</b> 📖\n\n{} registered {}\n{}",
					self.account_link(registerer).await,
					starname("", domain),
					self.tx_link_labeled(tx_hash, "TX"),
				);
				(text, None)
			}
			CandidateEvent::TransferAccount {
				account,
				domain,
				new_owner,
				tx_hash,
			} => {
				let text = format!(
					"📖 <b>Transfer Account</b> 📖\n\n{} ➡️ {}\n{}",
					starname(account, domain),
					self.account_link(new_owner).await,
					self.tx_link_labeled(tx_hash, "TX"),
				);
				(text, None)
			}
			CandidateEvent::TransferDomain {
				domain,
				new_owner,
				tx_hash,
			} => {
				let text = format!(
					"📖 <b>Transfer Domain</b> 📖\n\n{} ➡️ {}\n{}",
					starname("", domain),
					self.account_link(new_owner).await,
					self.tx_link_labeled(tx_hash, "TX"),
				);
				(text, None)
			}
			CandidateEvent::DeleteAccount {
				account,
				domain,
				sender,
				tx_hash,
			} => {
				let text = format!(
					"🗑️ <b>Delete Account</b> 🗑️\n\n{} deleted {}\n{}",
					self.account_link(sender).await,
					starname(account, domain),
					self.tx_link_labeled(tx_hash, "TX"),
				);
				(text, None)
			}
		};

		FormattedMessage {
			category,
			text,
			primary_amount,
		}
	}

	async fn render_restake(
		&self,
		validator: &str,
		legs: &[RestakeLeg],
		tx_hash: &str,
	) -> (String, String) {
		let mut text = format!(
			"♻️ <b>Restake Rewards</b> ♻️\n\n{}\n",
			self.account_link(validator).await
		);
		let mut totaler = DenomTotaler::new();
		for leg in legs {
			totaler.add(&leg.amount);
			text.push_str(&format!(
				"{} ➕ {}\n",
				self.account_link(&leg.delegator).await,
				self.denom_to_amount(&leg.amount).await,
			));
		}
		let total = totaler.current();
		text.push_str(&format!(
			"<b>Total:</b> {}",
			self.tx_link(tx_hash, &total).await
		));
		(text, total)
	}

	/// Converts a raw `<integer><denom>` amount to display form.
	///
	/// Base-denom amounts are scaled by the chain exponent and annotated with
	/// their fiat value at the latest refreshed price. `ibc/` denoms resolve
	/// through a denom trace to the configured foreign-asset table. Anything
	/// unresolvable renders as [`UNKNOWN_IBC`].
	pub async fn denom_to_amount(&self, raw: &str) -> String {
		let (amount, denom) = split_amount_denom(raw);

		if denom == self.chain.base_denom {
			let scaled = round2(amount / 10f64.powi(self.chain.exponent as i32));
			let fiat = round2(scaled * self.refs.base_price());
			return format!(
				"{} {} ({} {})",
				format_grouped(scaled),
				self.chain.display_name,
				format_grouped(fiat),
				self.currency,
			);
		}

		if denom.starts_with(IBC_DENOM_PREFIX) {
			let base = match self.enrichment.denom_trace_base(&denom).await {
				Ok(base) => base,
				Err(e) => {
					tracing::debug!("denom trace failed for {}: {}", denom, e);
					return UNKNOWN_IBC.to_string();
				}
			};
			if let Some(asset) = self.foreign_assets.iter().find(|a| a.base_denom == base) {
				let scaled = round2(amount / 10f64.powi(asset.exponent as i32));
				return match self.refs.asset_price(&asset.base_denom) {
					Some(price) => format!(
						"{} {} ({} {})",
						format_grouped(scaled),
						asset.symbol,
						format_grouped(round2(scaled * price)),
						self.currency,
					),
					// Price not warmed yet; show the bare amount
					None => format!("{} {}", format_grouped(scaled), asset.symbol),
				};
			}
			return UNKNOWN_IBC.to_string();
		}

		UNKNOWN_IBC.to_string()
	}

	/// Hyperlink to an account or validator, labelled with its display name.
	pub async fn account_link(&self, address: &str) -> String {
		let name = self.directory.display_name(address).await;
		format!(
			"<a href=\"{}{}\">{}</a>",
			self.explorer_base(address),
			address,
			escape_html(&name)
		)
	}

	/// Hyperlink to a transaction, labelled with the rendered amount.
	pub async fn tx_link(&self, hash: &str, raw_amount: &str) -> String {
		let label = self.denom_to_amount(raw_amount).await;
		format!("<a href=\"{}{}\">{}</a>", self.explorer.tx_url, hash, label)
	}

	fn tx_link_labeled(&self, hash: &str, label: &str) -> String {
		format!("<a href=\"{}{}\">{}</a>", self.explorer.tx_url, hash, label)
	}

	/// Explorer link base for an address, chosen by its bech32 prefix.
	fn explorer_base(&self, address: &str) -> &str {
		let home = &self.chain.bech32_prefix;
		if address.starts_with(home) {
			// Operator addresses carry the role suffix after the home prefix
			if address[home.len()..].starts_with("valoper") {
				return &self.explorer.validator_url;
			}
			return &self.explorer.account_url;
		}
		self.explorer
			.foreign
			.iter()
			.find(|f| address.starts_with(&f.prefix))
			.map(|f| f.account_url.as_str())
			.unwrap_or(&self.explorer.generic_account_url)
	}

	/// Optional memo decoration; failures yield an empty string.
	async fn memo_line(&self, tx_hash: &str) -> String {
		match self.enrichment.transaction_memo(tx_hash).await {
			Ok(memo) if !memo.is_empty() => format!("\n🗒️ {}", escape_html(&memo)),
			Ok(_) => String::new(),
			Err(e) => {
				tracing::debug!("memo lookup failed for {}: {}", tx_hash, e);
				String::new()
			}
		}
	}
}

/// Starname notation: `account*domain`, or `*domain` for a bare domain.
fn starname(account: &str, domain: &str) -> String {
	format!("{}*{}", account, domain)
}

/// Escapes text destined for the HTML markup subset.
fn escape_html(text: &str) -> String {
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}
