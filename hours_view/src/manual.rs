/*!

This is the long-form manual for `hours_view` and `hoursdash`.

## Input tables

Four extracts are read once at startup. Column names are those of the
spreadsheets exported by the time-control system; they can be overridden
per source in the configuration file.

### `timeEntries`

One row per logged time record.

| Auditor | Empresa | Tipo de revisión | Auditoría o proyecto | Horas | Clave de la Auditoria |
|---------|---------|------------------|----------------------|-------|-----------------------|

Only the rows of the whitelisted auditors whose audit key starts with the
fiscal-year prefix (`AI-24` by default) are used. A missing audit key is
read as an empty string, which is never in scope.

### `budgetByEntity`

The hours budgeted per entity for the year. The last row of the workbook
is a total and is dropped unless `dropLastRow` is set to `false`.

| Entidad | Horas Presupuestadas en 2024 |
|---------|------------------------------|

### `projectHours`

The hours-control sheet: one row per project with its budgeted and
incurred hours, and one column per tracked auditor.

| Proyectos | Horas presupuestadas | Horas Incurridas | Carlos Alan Quiroz Herrera | ... |
|-----------|----------------------|------------------|----------------------------|-----|

Each row gets four derived fields:
- `control = budgeted - incurred`. With the `guarded` zero-budget policy
  (the default), a project with no budget has `control = 0`; with the
  `unconditional` policy it shows all of its incurred hours as overrun.
- `remaining = max(control, 0)`
- `overrun = min(control, 0)`
- `adjusted_incurred = incurred + overrun`

### `capacity`

The capacity sheet holds two independent lists side by side: the hours
each auditor has available for projects, and the hours budgeted per entity.

| Integrante | Horas disponibles para proyectos | Entidad | Horas Presupuestas* |
|------------|----------------------------------|---------|---------------------|

Rows labeled `Total` are never used as an auditor capacity.

## Display modes

| Mode | Selection | Shown |
|------|-----------|-------|
| Overview | nothing selected | the four charts |
| Auditor focus | an auditor | the four charts, charts 1 and 3 as pies of incurred against available hours |
| Project focus | a project | the pie of the project |
| Table view | the table toggle | the capacity and budget table |

The table toggle wins over a project, and a project wins over an auditor.
The auditor filter still applies to charts 2 and 4 and to the KPIs when a
project is selected.

## The combined table

The capacity list and the budget-per-entity list share no key, so they
are paired by row position. When their lengths differ, the shorter side
is padded with empty cells, the table is flagged as misaligned and a
warning is logged.

*/
