use anchor_lang::prelude::*;

use crate::{
    constants::*,
    events::DonationElectionUpdated,
    instructions::shared::*,
    ledger::positions,
    state::{Position, ProtocolState},
};

#[derive(Accounts)]
pub struct UpdateDonation<'info> {
    #[account(
        seeds = [PROTOCOL_SEED],
        bump = protocol.bump
    )]
    pub protocol: Account<'info, ProtocolState>,

    #[account(
        mut,
        seeds = [POSITION_SEED, owner.key().as_ref()],
        bump = position.bump,
        has_one = owner
    )]
    pub position: Account<'info, Position>,

    pub owner: Signer<'info>,
    // Remaining accounts are the newly selected beneficiary records, in election order
}

pub fn update_donation(
    ctx: Context<UpdateDonation>,
    donation_bps: u16,
    beneficiaries: Vec<u16>,
) -> Result<()> {
    require_distinct(ctx.remaining_accounts)?;
    let records = load_beneficiaries(ctx.remaining_accounts, beneficiaries.len())?;

    positions::update_election(
        &ctx.accounts.protocol,
        &mut ctx.accounts.position,
        donation_bps,
        &beneficiaries,
        &records,
    )?;

    emit!(DonationElectionUpdated {
        owner: ctx.accounts.owner.key(),
        position_id: ctx.accounts.position.position_id,
        donation_bps,
        beneficiaries,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
