//! Booking flow.
//!
//! Collects facility type, employee id, date and floor, validating the
//! employee at each decision point, and finishes with a booking card.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::domain::conversation::Reply;
use crate::domain::dialog::{Flow, FlowName, FlowOptions, StepContext, StepError, StepOutcome};
use crate::domain::slots::SlotField;
use crate::domain::validation::{AvailabilityValidator, ValidityResult};
use crate::ports::{CardRenderer, CardTemplate, CardValues};

use super::prompts;

const STEPS: &[&str] = &[
    "ask_facility_type",
    "ask_employee_id",
    "check_employee",
    "check_date",
    "check_floor",
];

/// Facility type reserved for senior executives.
const OFFICE_SPACE: &str = "office space";

pub struct BookingFlow {
    validator: Arc<dyn AvailabilityValidator>,
    renderer: Arc<dyn CardRenderer>,
}

impl BookingFlow {
    pub fn new(validator: Arc<dyn AvailabilityValidator>, renderer: Arc<dyn CardRenderer>) -> Self {
        Self {
            validator,
            renderer,
        }
    }

    fn ask_facility_type(&self, ctx: &mut StepContext<'_>) -> StepOutcome {
        if let Some(FlowOptions::Seed(result)) = ctx.take_options() {
            for field in SlotField::ENTITIES {
                ctx.slots.set(field, result.entity(field).unwrap_or_default());
            }
        }
        StepOutcome::next_or_prompt(ctx.slots, SlotField::FacilityType, prompts::ASK_FACILITY_TYPE)
    }

    async fn validity(&self, ctx: &StepContext<'_>) -> Result<Option<ValidityResult>, StepError> {
        let employee_id = ctx.slots.value(SlotField::EmployeeId);
        Ok(self.validator.validate(employee_id).await?)
    }

    /// Clears the employee id and starts the flow over with every other slot kept.
    fn reject_employee(ctx: &mut StepContext<'_>) -> StepOutcome {
        ctx.slots.clear(SlotField::EmployeeId);
        ctx.say(prompts::EMPLOYEE_ID_INCORRECT);
        StepOutcome::replace(FlowName::BOOKING, FlowOptions::Carry)
    }

    /// Clears `field`, explains why, and hands over to a yes/no question.
    fn offer_alternative(ctx: &mut StepContext<'_>, field: SlotField, explanation: String) -> StepOutcome {
        ctx.slots.clear(field);
        ctx.say(explanation);
        StepOutcome::replace(FlowName::YES_NO, FlowOptions::Carry)
    }

    async fn check_employee(&self, ctx: &mut StepContext<'_>) -> Result<StepOutcome, StepError> {
        let validity = match self.validity(ctx).await? {
            Some(validity) if validity.role.is_valid() => validity,
            _ => return Ok(Self::reject_employee(ctx)),
        };

        let wants_office_space = ctx
            .slots
            .value(SlotField::FacilityType)
            .trim()
            .eq_ignore_ascii_case(OFFICE_SPACE);
        if wants_office_space && !validity.is_senior_executive() {
            return Ok(Self::offer_alternative(
                ctx,
                SlotField::FacilityType,
                prompts::OFFICE_SPACE_RESTRICTED.to_string(),
            ));
        }

        Ok(StepOutcome::next_or_prompt(ctx.slots, SlotField::Date, prompts::ASK_DATE))
    }

    async fn check_date(&self, ctx: &mut StepContext<'_>) -> Result<StepOutcome, StepError> {
        let Some(validity) = self.validity(ctx).await? else {
            return Ok(Self::reject_employee(ctx));
        };

        if !validity.date.is_valid() {
            let explanation = prompts::date_unavailable(ctx.slots.value(SlotField::FacilityType));
            return Ok(Self::offer_alternative(ctx, SlotField::Date, explanation));
        }

        Ok(StepOutcome::next_or_prompt(ctx.slots, SlotField::Floor, prompts::ASK_FLOOR))
    }

    async fn check_floor(&self, ctx: &mut StepContext<'_>) -> Result<StepOutcome, StepError> {
        let Some(validity) = self.validity(ctx).await? else {
            return Ok(Self::reject_employee(ctx));
        };

        if !validity.floor.is_valid() {
            let explanation = prompts::floor_unavailable(ctx.slots.value(SlotField::FacilityType));
            return Ok(Self::offer_alternative(ctx, SlotField::Floor, explanation));
        }

        let values = CardValues::from([
            ("employee_id".to_string(), ctx.slots.value(SlotField::EmployeeId).to_string()),
            ("facility_type".to_string(), ctx.slots.value(SlotField::FacilityType).to_string()),
            ("floor".to_string(), ctx.slots.value(SlotField::Floor).to_string()),
            ("date".to_string(), ctx.slots.value(SlotField::Date).to_string()),
        ]);
        let card = self
            .renderer
            .render(CardTemplate::BookingDetails, &values)
            .map_err(|e| StepError::Render(e.to_string()))?;

        info!(
            facility_type = ctx.slots.value(SlotField::FacilityType),
            floor = ctx.slots.value(SlotField::Floor),
            date = ctx.slots.value(SlotField::Date),
            "Booking completed"
        );
        ctx.send(Reply::card(card));
        Ok(StepOutcome::End)
    }
}

#[async_trait]
impl Flow for BookingFlow {
    fn name(&self) -> FlowName {
        FlowName::BOOKING
    }

    fn steps(&self) -> &'static [&'static str] {
        STEPS
    }

    async fn run_step(
        &self,
        index: usize,
        ctx: &mut StepContext<'_>,
    ) -> Result<StepOutcome, StepError> {
        match index {
            0 => Ok(self.ask_facility_type(ctx)),
            1 => Ok(StepOutcome::next_or_prompt(
                ctx.slots,
                SlotField::EmployeeId,
                prompts::ASK_EMPLOYEE_ID,
            )),
            2 => self.check_employee(ctx).await,
            3 => self.check_date(ctx).await,
            4 => self.check_floor(ctx).await,
            other => Err(StepError::UnknownStep(other)),
        }
    }
}
